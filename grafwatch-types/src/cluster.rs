//! Cluster identity and its path scoping convention.

use alloc::format;
use alloc::string::String;
use core::fmt;

/// Identifier of the management plane's own cluster.
pub const LOCAL_CLUSTER: &str = "local";

/// Opaque identity of a managed cluster.
///
/// The value `"local"` denotes the management plane itself and adds no
/// scoping to proxy paths. Any other value selects the cluster-scoped prefix
/// `/k8s/clusters/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ClusterId(String);

impl ClusterId {
    /// Create a cluster identity from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The management plane's own cluster.
    pub fn local() -> Self {
        Self(String::from(LOCAL_CLUSTER))
    }

    /// Whether this is the unscoped local cluster.
    pub fn is_local(&self) -> bool {
        self.0 == LOCAL_CLUSTER
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path prefix that scopes API requests to this cluster.
    ///
    /// Empty for the local cluster.
    pub fn path_prefix(&self) -> String {
        if self.is_local() {
            String::new()
        } else {
            format!("/k8s/clusters/{}", self.0)
        }
    }
}

impl Default for ClusterId {
    fn default() -> Self {
        Self::local()
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClusterId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ClusterId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
