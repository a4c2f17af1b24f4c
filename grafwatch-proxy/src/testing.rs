//! Dispatcher stub shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::{Dispatcher, ProxyError};

/// Yields taken by a successful request before it answers.
const ANSWER_DELAY_YIELDS: usize = 3;

/// Records every requested URL and answers with a fixed body, or fails for
/// URLs containing a marker.
///
/// Failing requests answer immediately; successful ones yield a few times
/// first, so a caller that stops polling after the first failure leaves them
/// unanswered.
#[derive(Debug)]
pub(crate) struct RecordingDispatcher {
    body: Value,
    fail_marker: Option<String>,
    urls: Mutex<Vec<String>>,
    answered: AtomicUsize,
}

impl RecordingDispatcher {
    /// Succeed for every URL with an empty JSON object.
    pub(crate) fn ok() -> Self {
        Self::with_body(json!({}))
    }

    /// Succeed for every URL with `body`.
    pub(crate) fn with_body(body: Value) -> Self {
        Self {
            body,
            fail_marker: None,
            urls: Mutex::new(Vec::new()),
            answered: AtomicUsize::new(0),
        }
    }

    /// A range-query body whose first series holds `values`.
    pub(crate) fn with_series(values: &[&str]) -> Self {
        let samples: Vec<Value> = values
            .iter()
            .enumerate()
            .map(|(i, v)| json!([1_700_000_000 + 30 * i as u64, v]))
            .collect();

        Self::with_body(json!({
            "status": "success",
            "data": {
                "resultType": "matrix",
                "result": [{"metric": {}, "values": samples}]
            }
        }))
    }

    /// A range-query body with no series.
    pub(crate) fn empty_result() -> Self {
        Self::with_body(json!({
            "status": "success",
            "data": {"resultType": "matrix", "result": []}
        }))
    }

    /// Fail with a 404 status for any URL containing `marker`.
    pub(crate) fn failing_on(marker: &str) -> Self {
        Self {
            fail_marker: Some(marker.to_string()),
            ..Self::ok()
        }
    }

    /// URLs requested so far, in request order.
    pub(crate) fn urls(&self) -> Vec<String> {
        self.urls.lock().clone()
    }

    /// Successful requests that ran to completion.
    pub(crate) fn answered(&self) -> usize {
        self.answered.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Dispatcher for RecordingDispatcher {
    async fn request(&self, url: &str) -> Result<Value, ProxyError> {
        self.urls.lock().push(url.to_string());

        if let Some(marker) = &self.fail_marker {
            if url.contains(marker.as_str()) {
                return Err(ProxyError::Status(404));
            }
        }

        for _ in 0..ANSWER_DELAY_YIELDS {
            tokio::task::yield_now().await;
        }

        self.answered.fetch_add(1, Ordering::SeqCst);
        Ok(self.body.clone())
    }
}
