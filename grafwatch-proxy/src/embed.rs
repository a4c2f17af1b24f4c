//! Addressing of the Grafana service behind the cluster API proxy.
//!
//! Embed URLs captured from Grafana point at the service through the local
//! API proxy. Everything after [`PROXY_DELIMITER`] is the dashboard-relative
//! path; it is re-anchored under [`service_prefix`] for the target cluster.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::form_urlencoded;

use grafwatch_types::ClusterId;

use crate::ProxyError;

/// Namespace the monitoring stack is installed into.
pub const MONITORING_NAMESPACE: &str = "cattle-monitoring-system";

/// Grafana service reference (`scheme:name:port`) used by the service proxy.
pub const GRAFANA_SERVICE: &str = "http:rancher-monitoring-grafana:80";

/// Substring every embed URL carries exactly once, immediately before the
/// dashboard-relative path.
pub const PROXY_DELIMITER: &str = "http:rancher-monitoring-grafana:80/proxy/";

/// Characters left unescaped in query keys and values: the unreserved set of
/// `encodeURIComponent`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Root of the Grafana service proxy for a cluster, with a trailing slash.
///
/// `{cluster prefix}/api/v1/namespaces/{namespace}/services/{service}/proxy/`
pub fn service_prefix(cluster: &ClusterId) -> String {
    format!(
        "{}/api/v1/namespaces/{}/services/{}/proxy/",
        cluster.path_prefix(),
        MONITORING_NAMESPACE,
        GRAFANA_SERVICE
    )
}

/// A parsed Grafana embed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedUrl {
    path: String,
    dashboard_path: String,
    query: Vec<(String, String)>,
}

impl EmbedUrl {
    /// Parse an absolute or host-relative embed URL.
    ///
    /// Fails with [`ProxyError::MalformedEmbedUrl`] unless the path contains
    /// [`PROXY_DELIMITER`] exactly once.
    pub fn parse(embed_url: &str) -> Result<Self, ProxyError> {
        let without_fragment = embed_url.split('#').next().unwrap_or_default();
        let (location, query) = match without_fragment.split_once('?') {
            Some((location, query)) => (location, query),
            None => (without_fragment, ""),
        };

        let path = strip_origin(location);

        let occurrences = path.matches(PROXY_DELIMITER).count();
        if occurrences != 1 {
            return Err(ProxyError::MalformedEmbedUrl(format!(
                "expected '{}' once in '{}', found {}",
                PROXY_DELIMITER, embed_url, occurrences
            )));
        }

        let dashboard_path = path
            .split_once(PROXY_DELIMITER)
            .map(|(_, rest)| rest.to_string())
            .unwrap_or_default();

        let query = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        Ok(Self {
            path: path.to_string(),
            dashboard_path,
            query,
        })
    }

    /// Full path of the embed URL, without origin or query.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path after the proxy delimiter, e.g. `d/abc123/etcd`.
    pub fn dashboard_path(&self) -> &str {
        &self.dashboard_path
    }

    /// Dashboard uid: the second segment of the dashboard-relative path.
    pub fn dashboard_uid(&self) -> Result<&str, ProxyError> {
        match self.dashboard_path.split('/').nth(1) {
            Some(uid) if !uid.is_empty() => Ok(uid),
            _ => Err(ProxyError::MalformedEmbedUrl(format!(
                "no dashboard uid in '{}'",
                self.dashboard_path
            ))),
        }
    }

    /// First value of a query parameter in the source URL.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All query parameters in source order.
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }
}

// Drop "scheme://authority" so only the path remains
fn strip_origin(location: &str) -> &str {
    match location.split_once("://") {
        Some((_, rest)) => rest.find('/').map(|idx| &rest[idx..]).unwrap_or(""),
        None => location,
    }
}

/// Ordered query parameters where a repeated key overwrites the earlier value
/// in place.
///
/// A `None` value renders as a bare key (`&kiosk`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, Option<String>)>,
}

impl QueryParams {
    /// Create an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing any earlier value for the same key.
    pub fn set(&mut self, key: impl Into<String>, value: Option<String>) -> &mut Self {
        let key = key.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
        self
    }

    /// Current value of `key`. `Some(None)` means the key is present but valueless.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref())
    }

    /// Check if no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Append the parameters to `base` as a query string.
    pub fn append_to(&self, base: &str) -> String {
        let mut out = String::from(base);
        for (key, value) in &self.pairs {
            out.push(if out.contains('?') { '&' } else { '?' });
            out.extend(utf8_percent_encode(key, QUERY_COMPONENT));
            if let Some(value) = value {
                out.push('=');
                out.extend(utf8_percent_encode(value, QUERY_COMPONENT));
            }
        }
        out
    }
}
