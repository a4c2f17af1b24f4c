//! The injected request capability.
//!
//! Every operation in this crate receives a [`Dispatcher`] explicitly. The
//! core only builds proxy-relative URLs and interprets responses; transport,
//! base endpoint, credentials, timeouts and cancellation all belong to the
//! dispatcher.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::ProxyError;

/// Performs one request against the management API and returns the decoded
/// JSON body.
///
/// `url` is relative to the management API root, for example
/// `/k8s/clusters/c-m-1/api/v1/namespaces/...`.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use grafwatch_proxy::{Dispatcher, ProxyError};
/// use serde_json::{json, Value};
///
/// struct Canned;
///
/// #[async_trait]
/// impl Dispatcher for Canned {
///     async fn request(&self, _url: &str) -> Result<Value, ProxyError> {
///         Ok(json!({"status": "success", "data": {"result": []}}))
///     }
/// }
/// ```
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Issue a request for `url`.
    ///
    /// Any failure (transport, status, decoding) is reported as an error.
    async fn request(&self, url: &str) -> Result<Value, ProxyError>;
}

#[async_trait]
impl<D: Dispatcher + ?Sized> Dispatcher for &D {
    async fn request(&self, url: &str) -> Result<Value, ProxyError> {
        (**self).request(url).await
    }
}

#[async_trait]
impl<D: Dispatcher + ?Sized> Dispatcher for Arc<D> {
    async fn request(&self, url: &str) -> Result<Value, ProxyError> {
        (**self).request(url).await
    }
}

#[async_trait]
impl<D: Dispatcher + ?Sized> Dispatcher for Box<D> {
    async fn request(&self, url: &str) -> Result<Value, ProxyError> {
        (**self).request(url).await
    }
}
