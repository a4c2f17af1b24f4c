//! Condensed etcd health indicators.

/// etcd health as seen through the cluster's metrics backend.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EtcdHealth {
    /// Whether the last sample of the 5 minute window reported a leader.
    pub has_leader: bool,

    /// Leader changes seen, last sample of the 60 minute window.
    pub leader_changes: f64,

    /// Failed proposals, last sample of the 60 minute window.
    pub failed_proposals: f64,

    /// Unix timestamp in milliseconds when the indicators were collected.
    pub timestamp_ms: u64,
}

impl EtcdHealth {
    /// A leader is present and no proposal has failed.
    pub fn is_healthy(&self) -> bool {
        self.has_leader && self.failed_proposals == 0.0
    }
}
