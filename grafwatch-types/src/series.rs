//! Range-query results: samples, series and the response envelope.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// A single `[timestamp, value]` pair from a range query.
///
/// Values stay as the backend sent them (strings), so reductions decide how
/// to interpret them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample(pub f64, pub String);

impl Sample {
    /// Create a sample.
    pub fn new(timestamp: f64, value: impl Into<String>) -> Self {
        Self(timestamp, value.into())
    }

    /// Epoch seconds of the sample.
    pub fn timestamp(&self) -> f64 {
        self.0
    }

    /// Raw sample value.
    pub fn value(&self) -> &str {
        &self.1
    }
}

/// One labelled, time-ordered sequence of samples.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Series {
    /// Label set identifying the series.
    #[cfg_attr(feature = "serde", serde(default))]
    pub metric: BTreeMap<String, String>,

    /// Samples in chronological order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub values: Vec<Sample>,
}

impl Series {
    /// A series with no labels.
    pub fn from_values(values: Vec<Sample>) -> Self {
        Self {
            metric: BTreeMap::new(),
            values,
        }
    }

    /// The most recent sample, if any.
    pub fn last(&self) -> Option<&Sample> {
        self.values.last()
    }

    /// Value of the most recent sample, if any.
    pub fn last_value(&self) -> Option<&str> {
        self.last().map(Sample::value)
    }
}

/// The `data` section of a range-query response.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueryResult {
    /// Kind of result, `"matrix"` for range queries.
    #[cfg_attr(feature = "serde", serde(rename = "resultType", default))]
    pub result_type: String,

    /// Series in backend order. No ordering across series is implied.
    #[cfg_attr(feature = "serde", serde(default))]
    pub result: Vec<Series>,
}

impl QueryResult {
    /// Wrap series as a matrix result.
    pub fn from_series(result: Vec<Series>) -> Self {
        Self {
            result_type: String::from("matrix"),
            result,
        }
    }

    /// Check if the result holds no series.
    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }

    /// Number of series.
    pub fn len(&self) -> usize {
        self.result.len()
    }

    /// Last sample value of the first series.
    ///
    /// This is the value every derived health metric condenses a query to.
    pub fn last_value(&self) -> Option<&str> {
        self.result.first().and_then(Series::last_value)
    }
}

/// Full body of a range-query response.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueryResponse {
    /// `"success"` or `"error"`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: String,

    /// Query payload.
    pub data: QueryResult,
}
