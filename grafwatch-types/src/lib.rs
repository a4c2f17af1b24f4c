//! # grafwatch-types
//!
//! Core types for querying cluster monitoring through the management API
//! proxy. This crate defines the values that flow between the URL rewriter,
//! the range-query executor and the etcd health reductions in
//! `grafwatch-proxy`.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable the `serde` feature to decode query responses
//! - **Transient values**: Everything here is built per call and discarded afterwards
//!
//! ## Features
//!
//! - `std` (default): Wall-clock helpers such as [`TimeRange::last`]
//! - `serde`: Decoding of range-query responses and encoding of [`EtcdHealth`]
//!
//! ## Example
//!
//! ```rust
//! use grafwatch_types::{ClusterId, QueryResult, Sample, Series, TimeRange};
//! use std::time::Duration;
//!
//! let cluster = ClusterId::from("c-m-abc123");
//! assert_eq!(cluster.path_prefix(), "/k8s/clusters/c-m-abc123");
//!
//! let range = TimeRange::ending_at(1_700_000_000.0, Duration::from_secs(300));
//! assert_eq!(range.start, 1_699_999_700.0);
//!
//! let result = QueryResult::from_series(vec![Series::from_values(vec![
//!     Sample::new(1_699_999_700.0, "0"),
//!     Sample::new(1_700_000_000.0, "1"),
//! ])]);
//! assert_eq!(result.last_value(), Some("1"));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod cluster;
mod health;
mod range;
mod series;

pub use cluster::*;
pub use health::*;
pub use range::*;
pub use series::*;
