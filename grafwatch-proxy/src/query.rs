//! Range queries against the metrics datasource behind Grafana.

use tracing::debug;

use grafwatch_types::{ClusterId, QueryResponse, QueryResult, TimeRange};

use crate::embed::service_prefix;
use crate::{Dispatcher, ProxyError};

/// Grafana datasource proxy path of the cluster's Prometheus range-query API.
pub const QUERY_RANGE_PATH: &str = "api/datasources/proxy/1/api/v1/query_range";

/// Range-query URL for `query` over `range` at `step` seconds.
///
/// Arguments are inserted literally; the caller supplies a well-formed
/// expression.
pub fn query_range_url(cluster: &ClusterId, query: &str, range: TimeRange, step: u64) -> String {
    format!(
        "{}{}?query={}&start={}&end={}&step={}",
        service_prefix(cluster),
        QUERY_RANGE_PATH,
        query,
        range.start,
        range.end,
        step
    )
}

/// Run one range query and return the decoded result unmodified.
///
/// Dispatcher and decoding failures are returned to the caller.
pub async fn query_range<D>(
    dispatcher: &D,
    cluster: &ClusterId,
    query: &str,
    range: TimeRange,
    step: u64,
) -> Result<QueryResult, ProxyError>
where
    D: Dispatcher + ?Sized,
{
    let url = query_range_url(cluster, query, range, step);
    debug!(cluster = %cluster, url = %url, "range query");

    let body = dispatcher.request(&url).await?;
    let response: QueryResponse = serde_json::from_value(body)?;

    debug!(
        cluster = %cluster,
        status = %response.status,
        series = response.data.len(),
        "range query complete"
    );

    Ok(response.data)
}
