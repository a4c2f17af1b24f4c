//! Error types for proxy requests and URL rewriting.

use thiserror::Error;

/// Failures while addressing Grafana through the cluster proxy or reading
/// what it returned.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The dispatcher could not complete the proxy request.
    #[error("proxy request failed: {0}")]
    Http(String),

    /// The proxy answered with a non-success status.
    #[error("proxy returned status {0}")]
    Status(u16),

    /// The proxied body is not the expected JSON shape, or a sample value
    /// is not a number.
    #[error("unexpected proxy response: {0}")]
    Parse(String),

    /// The management API rejected the session for this cluster proxy.
    #[error("proxy access denied: {0}")]
    Auth(String),

    /// The management API endpoint could not be reached.
    #[error("management API unreachable: {0}")]
    Connection(String),

    /// The dispatcher gave up waiting for the proxy.
    #[error("proxy request timed out")]
    Timeout,

    /// The embed URL does not contain the Grafana proxy segment exactly once,
    /// or carries no dashboard uid after it.
    #[error("malformed embed URL: {0}")]
    MalformedEmbedUrl(String),
}

impl From<serde_json::Error> for ProxyError {
    fn from(err: serde_json::Error) -> Self {
        ProxyError::Parse(err.to_string())
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProxyError::Timeout
        } else if err.is_connect() {
            ProxyError::Connection(err.to_string())
        } else if err.is_decode() {
            ProxyError::Parse(err.to_string())
        } else {
            ProxyError::Http(err.to_string())
        }
    }
}
