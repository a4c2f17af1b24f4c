//! Output formatting for etcd health and range-query results.

use grafwatch_types::{ClusterId, EtcdHealth, QueryResult};

/// Human-readable etcd health summary.
pub fn format_health(cluster: &ClusterId, health: &EtcdHealth) -> String {
    let status = if health.is_healthy() { "healthy" } else { "unhealthy" };
    let leader = if health.has_leader { "yes" } else { "no" };

    format!(
        "cluster:          {}\n\
         status:           {}\n\
         leader present:   {}\n\
         leader changes:   {} (1h)\n\
         failed proposals: {} (1h)",
        cluster, status, leader, health.leader_changes, health.failed_proposals
    )
}

/// JSON document for etcd health, including the cluster it was taken from.
pub fn health_json(cluster: &ClusterId, health: &EtcdHealth) -> serde_json::Value {
    serde_json::json!({
        "cluster": cluster,
        "healthy": health.is_healthy(),
        "etcd": health,
    })
}

/// JSON document for a raw range query.
pub fn query_json(query: &str, result: &QueryResult) -> serde_json::Value {
    serde_json::json!({
        "query": query,
        "series": result.len(),
        "last_value": result.last_value(),
        "result": result,
    })
}
