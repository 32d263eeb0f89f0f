//! Core types for the pairscope pairs-trading analytics toolkit.
//!
//! This crate provides the fundamental data structures used throughout pairscope:
//!
//! - [`Tick`] - A single trade with symbol, timestamp, price and quantity
//! - [`Interval`] - Fixed-width bucketing interval (e.g. `1min`, `5s`, `4h`)
//! - [`RegressionType`] - Hedge ratio regression variant
//! - [`PairscopeError`] - Classified failures surfaced to callers

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/pairscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod interval;
mod regression;
mod tick;

pub use error::{ErrorKind, PairscopeError, Result};
pub use interval::{Interval, IntervalParseError, IntervalUnit};
pub use regression::{RegressionParseError, RegressionType};
pub use tick::Tick;
