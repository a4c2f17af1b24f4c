//! Dashboard URL rewriting and existence checks.
//!
//! ## Example
//!
//! ```rust
//! use grafwatch_proxy::dashboard::dashboard_url;
//! use grafwatch_types::ClusterId;
//!
//! let embed = "https://rancher.example.com/api/v1/namespaces/cattle-monitoring-system/services/http:rancher-monitoring-grafana:80/proxy/d/abc123/view?orgId=7&viewPanel=3";
//!
//! let url = dashboard_url(embed, &ClusterId::from("c-m-1"), &[("theme", "dark")]).unwrap();
//! assert_eq!(
//!     url,
//!     "/k8s/clusters/c-m-1/api/v1/namespaces/cattle-monitoring-system/services/http:rancher-monitoring-grafana:80/proxy/d/abc123/view?viewPanel=3&orgId=7&kiosk&theme=dark"
//! );
//! ```

use futures_util::future::join_all;
use tracing::{debug, warn};

use grafwatch_types::ClusterId;

use crate::embed::{service_prefix, EmbedUrl, QueryParams};
use crate::{Dispatcher, ProxyError};

/// Rewrite an embed URL into a proxy URL scoped to `cluster`.
///
/// Parameters are applied in order, later steps overriding earlier keys:
/// `viewPanel` from the source when present, `orgId` from the source, a
/// valueless `kiosk` marker, then every entry of `params`.
pub fn dashboard_url(
    embed_url: &str,
    cluster: &ClusterId,
    params: &[(&str, &str)],
) -> Result<String, ProxyError> {
    let embed = EmbedUrl::parse(embed_url)?;
    let base = format!("{}{}", service_prefix(cluster), embed.dashboard_path());

    let mut query = QueryParams::new();
    if let Some(panel) = embed.query_param("viewPanel").filter(|p| !p.is_empty()) {
        query.set("viewPanel", Some(panel.to_string()));
    }
    if let Some(org) = embed.query_param("orgId") {
        query.set("orgId", Some(org.to_string()));
    }
    query.set("kiosk", None);

    for (key, value) in params {
        query.set(*key, Some((*value).to_string()));
    }

    Ok(query.append_to(&base))
}

/// Status-API URL for the dashboard an embed URL points at.
pub fn dashboard_status_url(embed_url: &str, cluster: &ClusterId) -> Result<String, ProxyError> {
    let embed = EmbedUrl::parse(embed_url)?;
    let uid = embed.dashboard_uid()?;

    Ok(format!("{}api/dashboards/uid/{}", service_prefix(cluster), uid))
}

/// Check whether the dashboard behind `embed_url` exists on `cluster`.
///
/// Exactly one request is issued. Every failure is reported as `false`:
/// a missing dashboard, an unreachable proxy, a rejected request and a
/// malformed embed URL are not distinguished.
pub async fn dashboard_exists<D>(dispatcher: &D, cluster: &ClusterId, embed_url: &str) -> bool
where
    D: Dispatcher + ?Sized,
{
    let url = match dashboard_status_url(embed_url, cluster) {
        Ok(url) => url,
        Err(e) => {
            warn!(cluster = %cluster, error = %e, "cannot address dashboard");
            return false;
        }
    };

    debug!(cluster = %cluster, url = %url, "checking dashboard");

    match dispatcher.request(&url).await {
        Ok(_) => true,
        Err(e) => {
            warn!(cluster = %cluster, url = %url, error = %e, "dashboard check failed");
            false
        }
    }
}

/// Check that every dashboard in `embed_urls` exists on `cluster`.
///
/// All checks run concurrently and every one of them completes before the
/// result is reduced; a failing check does not cancel the others. An empty
/// list is vacuously `true`.
pub async fn all_dashboards_exist<D, S>(
    dispatcher: &D,
    cluster: &ClusterId,
    embed_urls: &[S],
) -> bool
where
    D: Dispatcher + ?Sized,
    S: AsRef<str>,
{
    let checks = embed_urls
        .iter()
        .map(|url| dashboard_exists(dispatcher, cluster, url.as_ref()));

    let results = join_all(checks).await;
    debug!(
        cluster = %cluster,
        total = results.len(),
        present = results.iter().filter(|exists| **exists).count(),
        "dashboard checks complete"
    );

    results.into_iter().all(|exists| exists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::PROXY_DELIMITER;
    use crate::testing::RecordingDispatcher;

    fn embed(path_and_query: &str) -> String {
        format!(
            "https://rancher.example.com/api/v1/namespaces/cattle-monitoring-system/services/{}{}",
            PROXY_DELIMITER, path_and_query
        )
    }

    #[test]
    fn test_local_cluster_has_no_cluster_segment() {
        let url = dashboard_url(&embed("d/abc123/view"), &ClusterId::local(), &[]).unwrap();
        assert!(!url.contains("/k8s/clusters/"));
        assert!(url.starts_with("/api/v1/namespaces/cattle-monitoring-system/"));
    }

    #[test]
    fn test_remote_cluster_segment_appears_once() {
        let cluster = ClusterId::from("c-m-x");
        let url = dashboard_url(&embed("d/abc123/view"), &cluster, &[]).unwrap();
        assert_eq!(url.matches("/k8s/clusters/c-m-x").count(), 1);
        assert!(url.starts_with("/k8s/clusters/c-m-x/api/v1/"));
    }

    #[test]
    fn test_forwards_org_panel_and_kiosk() {
        let url = dashboard_url(
            &embed("d/abc123/view?orgId=7&viewPanel=3"),
            &ClusterId::local(),
            &[],
        )
        .unwrap();

        let (path, query) = url.split_once('?').unwrap();
        assert!(path.ends_with("/proxy/d/abc123/view"));

        let pairs: Vec<&str> = query.split('&').collect();
        assert!(pairs.contains(&"orgId=7"));
        assert!(pairs.contains(&"viewPanel=3"));
        assert!(pairs.contains(&"kiosk"));
        assert_eq!(pairs.len(), 3);
    }

    #[test]
    fn test_extra_params_override_forwarded() {
        let url = dashboard_url(
            &embed("d/abc123/view?orgId=7&viewPanel=3"),
            &ClusterId::local(),
            &[("orgId", "9")],
        )
        .unwrap();

        assert!(url.contains("orgId=9"));
        assert!(!url.contains("orgId=7"));
        assert_eq!(url.matches("orgId").count(), 1);
    }

    #[test]
    fn test_extra_params_can_replace_kiosk() {
        let source = embed("d/abc/view?orgId=1");
        let url = dashboard_url(&source, &ClusterId::local(), &[("kiosk", "tv")]).unwrap();
        assert!(url.ends_with("?orgId=1&kiosk=tv"));
    }

    #[test]
    fn test_view_panel_only_when_present() {
        let url = dashboard_url(&embed("d/abc/view?orgId=1"), &ClusterId::local(), &[]).unwrap();
        assert!(!url.contains("viewPanel"));

        let source = embed("d/abc/view?orgId=1&viewPanel=");
        let url = dashboard_url(&source, &ClusterId::local(), &[]).unwrap();
        assert!(!url.contains("viewPanel"));
    }

    #[test]
    fn test_other_source_params_are_dropped() {
        let url = dashboard_url(
            &embed("d/abc/view?orgId=1&from=now-1h&refresh=30s"),
            &ClusterId::local(),
            &[],
        )
        .unwrap();
        assert!(url.ends_with("/proxy/d/abc/view?orgId=1&kiosk"));
    }

    #[test]
    fn test_rewrite_is_deterministic() {
        let source = embed("d/abc123/view?orgId=7&viewPanel=3");
        let cluster = ClusterId::from("c-m-x");
        let params = [("theme", "light"), ("var-node", "etcd-0")];

        let first = dashboard_url(&source, &cluster, &params).unwrap();
        let second = dashboard_url(&source, &cluster, &params).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rewrite_malformed() {
        let source = "https://grafana.example.com/d/abc/view";
        let err = dashboard_url(source, &ClusterId::local(), &[]).unwrap_err();
        assert!(matches!(err, ProxyError::MalformedEmbedUrl(_)));
    }

    #[test]
    fn test_status_url() {
        let source = embed("d/abc123/view?orgId=1");
        let url = dashboard_status_url(&source, &ClusterId::from("c-1")).unwrap();
        assert_eq!(
            url,
            "/k8s/clusters/c-1/api/v1/namespaces/cattle-monitoring-system/services/http:rancher-monitoring-grafana:80/proxy/api/dashboards/uid/abc123"
        );
    }

    #[tokio::test]
    async fn test_exists_success() {
        let dispatcher = RecordingDispatcher::ok();
        let source = embed("d/abc123/view");
        assert!(dashboard_exists(&dispatcher, &ClusterId::local(), &source).await);

        let urls = dispatcher.urls();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].ends_with("/proxy/api/dashboards/uid/abc123"));
    }

    #[tokio::test]
    async fn test_exists_failure_is_false() {
        let dispatcher = RecordingDispatcher::failing_on("abc123");
        let source = embed("d/abc123/view");
        assert!(!dashboard_exists(&dispatcher, &ClusterId::local(), &source).await);
        assert_eq!(dispatcher.urls().len(), 1);
    }

    #[tokio::test]
    async fn test_exists_malformed_is_false_without_request() {
        let dispatcher = RecordingDispatcher::ok();
        let source = "https://grafana/d/abc/view";
        assert!(!dashboard_exists(&dispatcher, &ClusterId::local(), source).await);
        assert!(dispatcher.urls().is_empty());
    }

    #[tokio::test]
    async fn test_all_exist_empty_is_true() {
        let dispatcher = RecordingDispatcher::failing_on("");
        let none: [&str; 0] = [];
        assert!(all_dashboards_exist(&dispatcher, &ClusterId::local(), &none).await);
        assert!(dispatcher.urls().is_empty());
    }

    #[tokio::test]
    async fn test_all_exist_every_present() {
        let dispatcher = RecordingDispatcher::ok();
        let urls = vec![embed("d/one/a"), embed("d/two/b"), embed("d/three/c")];
        assert!(all_dashboards_exist(&dispatcher, &ClusterId::from("c-2"), &urls).await);
        assert_eq!(dispatcher.urls().len(), 3);
    }

    #[tokio::test]
    async fn test_all_exist_single_failure_runs_every_check() {
        let dispatcher = RecordingDispatcher::failing_on("/uid/one");
        let urls = vec![embed("d/one/a"), embed("d/two/b"), embed("d/three/c")];

        assert!(!all_dashboards_exist(&dispatcher, &ClusterId::local(), &urls).await);

        // The failing first check answers at once; the others still finish
        let requested = dispatcher.urls();
        assert_eq!(requested.len(), 3);
        assert!(requested.iter().any(|u| u.ends_with("/uid/three")));
        assert!(requested.iter().any(|u| u.ends_with("/uid/two")));
        assert_eq!(dispatcher.answered(), 2);
    }

    #[tokio::test]
    async fn test_all_exist_matches_individual_checks() {
        let cluster = ClusterId::local();
        let urls = vec![embed("d/keep/a"), embed("d/gone/b")];

        let dispatcher = RecordingDispatcher::failing_on("/uid/gone");
        let individual = [
            dashboard_exists(&dispatcher, &cluster, &urls[0]).await,
            dashboard_exists(&dispatcher, &cluster, &urls[1]).await,
        ];
        let all = all_dashboards_exist(&dispatcher, &cluster, &urls).await;

        assert_eq!(individual, [true, false]);
        assert_eq!(all, individual.iter().all(|e| *e));
    }
}
