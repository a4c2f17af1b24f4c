//! etcd health indicators derived from range queries.
//!
//! Each indicator queries a fixed window ending now at a 30 second step and
//! condenses the result to the last sample of the first series. Nothing is
//! cached or retried; failures propagate.
//!
//! ## Example
//!
//! ```rust,no_run
//! use grafwatch_proxy::{etcd, HttpDispatcher};
//! use grafwatch_types::ClusterId;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dispatcher = HttpDispatcher::builder()
//!         .endpoint("https://rancher.example.com")
//!         .build()?;
//!
//!     let health = etcd::etcd_health(&dispatcher, &ClusterId::from("c-m-1")).await?;
//!     println!("leader: {}, changes: {}", health.has_leader, health.leader_changes);
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use tracing::debug;

use grafwatch_types::{now_millis, ClusterId, EtcdHealth, QueryResult, TimeRange};

use crate::query::query_range;
use crate::{Dispatcher, ProxyError};

/// Resolution of every health query, in seconds.
pub const STEP_SECS: u64 = 30;

/// Window of the leader-presence query.
pub const LEADER_WINDOW: Duration = Duration::from_secs(5 * 60);

/// Window of the leader-change and failed-proposal queries.
pub const HISTORY_WINDOW: Duration = Duration::from_secs(60 * 60);

/// Whether etcd currently reports a leader.
pub const HAS_LEADER_QUERY: &str = "max(etcd_server_has_leader)";

/// Leader changes seen by the busiest member.
pub const LEADER_CHANGES_QUERY: &str = "max(etcd_server_leader_changes_seen_total)";

/// Failed proposals summed over members.
pub const FAILED_PROPOSALS_QUERY: &str = "sum(etcd_server_proposals_failed_total)";

/// `true` iff the last sample of the first series is exactly `"1"`.
pub async fn has_leader<D>(dispatcher: &D, cluster: &ClusterId) -> Result<bool, ProxyError>
where
    D: Dispatcher + ?Sized,
{
    let result = query_window(dispatcher, cluster, HAS_LEADER_QUERY, LEADER_WINDOW).await?;
    Ok(leader_present(&result))
}

/// Leader changes over the last hour, `0` when no sample exists.
pub async fn leader_changes<D>(dispatcher: &D, cluster: &ClusterId) -> Result<f64, ProxyError>
where
    D: Dispatcher + ?Sized,
{
    let result = query_window(dispatcher, cluster, LEADER_CHANGES_QUERY, HISTORY_WINDOW).await?;
    last_number(&result)
}

/// Failed proposals over the last hour, `0` when no sample exists.
pub async fn failed_proposals<D>(dispatcher: &D, cluster: &ClusterId) -> Result<f64, ProxyError>
where
    D: Dispatcher + ?Sized,
{
    let result = query_window(dispatcher, cluster, FAILED_PROPOSALS_QUERY, HISTORY_WINDOW).await?;
    last_number(&result)
}

/// Collect all three indicators concurrently.
///
/// The first failing query fails the whole snapshot.
pub async fn etcd_health<D>(dispatcher: &D, cluster: &ClusterId) -> Result<EtcdHealth, ProxyError>
where
    D: Dispatcher + ?Sized,
{
    let (has_leader, leader_changes, failed_proposals) = futures_util::try_join!(
        has_leader(dispatcher, cluster),
        leader_changes(dispatcher, cluster),
        failed_proposals(dispatcher, cluster),
    )?;

    Ok(EtcdHealth {
        has_leader,
        leader_changes,
        failed_proposals,
        timestamp_ms: now_millis(),
    })
}

async fn query_window<D>(
    dispatcher: &D,
    cluster: &ClusterId,
    query: &str,
    window: Duration,
) -> Result<QueryResult, ProxyError>
where
    D: Dispatcher + ?Sized,
{
    let range = TimeRange::last(window);
    debug!(cluster = %cluster, query, start = range.start, end = range.end, "etcd health query");
    query_range(dispatcher, cluster, query, range, STEP_SECS).await
}

fn leader_present(result: &QueryResult) -> bool {
    result.last_value() == Some("1")
}

fn last_number(result: &QueryResult) -> Result<f64, ProxyError> {
    match result.last_value() {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ProxyError::Parse(format!("sample value '{}' is not a number", value))),
        None => Ok(0.0),
    }
}
