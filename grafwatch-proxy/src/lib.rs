//! # grafwatch-proxy
//!
//! Reach a cluster's Grafana through the management API's service proxy:
//! rewrite embedded dashboard URLs, verify that dashboards exist, and derive
//! etcd health from Prometheus range queries.
//!
//! All network I/O goes through an injected [`Dispatcher`]; nothing here holds
//! state between calls.
//!
//! ## Components
//!
//! - [`dashboard::dashboard_url`] - embed URL + cluster + overrides → proxy URL
//! - [`dashboard::dashboard_exists`] / [`dashboard::all_dashboards_exist`] -
//!   status checks that reduce every failure to `false`
//! - [`query::query_range`] - one range query, failures propagated
//! - [`etcd`] - leader presence, leader changes and failed proposals
//! - [`HttpDispatcher`] (`http` feature, default) - reqwest-backed dispatcher
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use grafwatch_proxy::{dashboard, etcd, HttpDispatcher};
//! use grafwatch_types::ClusterId;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dispatcher = HttpDispatcher::builder()
//!         .endpoint("https://rancher.example.com")
//!         .build()?;
//!     let cluster = ClusterId::from("c-m-1");
//!
//!     let embed = "https://rancher.example.com/api/v1/namespaces/cattle-monitoring-system/services/http:rancher-monitoring-grafana:80/proxy/d/rancher-etcd-1/etcd?orgId=1";
//!     if dashboard::all_dashboards_exist(&dispatcher, &cluster, &[embed]).await {
//!         println!("{}", dashboard::dashboard_url(embed, &cluster, &[("theme", "light")])?);
//!     }
//!
//!     println!("leader: {}", etcd::has_leader(&dispatcher, &cluster).await?);
//!     Ok(())
//! }
//! ```

pub mod dashboard;
pub mod dispatch;
pub mod embed;
pub mod error;
pub mod etcd;
pub mod query;

#[cfg(feature = "http")]
pub mod http;

#[cfg(test)]
mod testing;

pub use dispatch::Dispatcher;
pub use embed::{EmbedUrl, QueryParams};
pub use error::ProxyError;

#[cfg(feature = "http")]
pub use http::{HttpDispatcher, HttpDispatcherBuilder};

// Re-export types for convenience
pub use grafwatch_types::{ClusterId, EtcdHealth, QueryResult, Sample, Series, TimeRange};
