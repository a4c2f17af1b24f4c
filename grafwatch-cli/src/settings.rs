//! Layered configuration for the command line tool.
//!
//! Sources, later ones winning:
//!
//! 1. built-in defaults
//! 2. a TOML file (`--config <path>`, or `grafwatch.toml` in the working
//!    directory when present)
//! 3. `GRAFWATCH_*` environment variables
//! 4. command line flags (applied by the caller)
//!
//! ```toml
//! endpoint = "https://rancher.example.com"
//! cluster = "c-m-7x2k9"
//! timeout = "10s"
//! insecure = false
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use grafwatch_types::ClusterId;

use crate::duration::parse_duration;

/// Default config file looked up in the working directory.
const DEFAULT_CONFIG_NAME: &str = "grafwatch";

/// Resolved tool settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    /// Management API endpoint.
    pub endpoint: String,
    /// Cluster to scope requests to.
    pub cluster: String,
    /// Request timeout as a duration string.
    pub timeout: String,
    /// Accept invalid TLS certificates.
    pub insecure: bool,
}

impl Settings {
    /// Load settings from defaults, an optional file and the environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("endpoint", "https://localhost")?
            .set_default("cluster", grafwatch_types::LOCAL_CLUSTER)?
            .set_default("timeout", "10s")?
            .set_default("insecure", false)?;

        builder = match config_path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        let config = builder
            .add_source(Environment::with_prefix("GRAFWATCH"))
            .build()
            .context("Failed to load configuration")?;

        config
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Cluster identity to scope requests to.
    pub fn cluster_id(&self) -> ClusterId {
        ClusterId::from(self.cluster.as_str())
    }

    /// Parsed request timeout.
    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(&self.timeout)
            .with_context(|| format!("Invalid timeout '{}'", self.timeout))
    }
}
