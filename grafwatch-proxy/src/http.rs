//! reqwest-backed [`Dispatcher`] for the management API.
//!
//! Requests are issued as `GET {endpoint}{url}` where `url` is the
//! proxy-relative URL built by this crate. Session handling is left to the
//! client configuration; this dispatcher only reports failures.
//!
//! ## Example
//!
//! ```rust,no_run
//! use grafwatch_proxy::{dashboard, HttpDispatcher};
//! use grafwatch_types::ClusterId;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dispatcher = HttpDispatcher::builder()
//!         .endpoint("https://rancher.example.com")
//!         .timeout(Duration::from_secs(5))
//!         .build()?;
//!
//!     let embed = "https://rancher.example.com/api/v1/namespaces/cattle-monitoring-system/services/http:rancher-monitoring-grafana:80/proxy/d/rancher-etcd-1/etcd?orgId=1";
//!     let present = dashboard::dashboard_exists(&dispatcher, &ClusterId::local(), embed).await;
//!     println!("etcd dashboard present: {}", present);
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::{Dispatcher, ProxyError};

/// Dispatcher that sends requests to a management API endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    client: Client,
    endpoint: String,
}

impl HttpDispatcher {
    /// Create a new builder for configuring the dispatcher.
    pub fn builder() -> HttpDispatcherBuilder {
        HttpDispatcherBuilder::default()
    }

    /// Base endpoint requests are issued against.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn full_url(&self, url: &str) -> String {
        format!("{}{}", self.endpoint, url)
    }
}

#[async_trait]
impl Dispatcher for HttpDispatcher {
    async fn request(&self, url: &str) -> Result<Value, ProxyError> {
        let full_url = self.full_url(url);
        debug!(url = %full_url, "GET");

        let response = self
            .client
            .get(&full_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ProxyError::Auth(format!("API returned status {}", status)));
        }

        if !status.is_success() {
            return Err(ProxyError::Status(status.as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProxyError::Parse(e.to_string()))?;

        Ok(body)
    }
}

/// Builder for HttpDispatcher.
#[derive(Debug, Default)]
pub struct HttpDispatcherBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
    accept_invalid_certs: bool,
}

impl HttpDispatcherBuilder {
    /// Set the management API endpoint (e.g., "https://rancher.example.com").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Accept self-signed or otherwise invalid TLS certificates.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Build the dispatcher.
    pub fn build(self) -> Result<HttpDispatcher, ProxyError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()?;

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| "https://localhost".to_string());

        Ok(HttpDispatcher {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }
}
