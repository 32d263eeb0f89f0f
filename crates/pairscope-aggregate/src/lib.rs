//! Tick bucketing and alignment for pairscope.
//!
//! This crate turns raw trade ticks into a two-symbol table:
//!
//! - [`Bar`] - Last price and summed volume for one symbol over one interval
//! - [`TickBucketer`] - Streaming tick-to-bar bucketer
//! - [`bucket_by_symbol`] - Buckets a mixed tick snapshot per symbol
//! - [`align`] - Merges two bar series into forward-filled [`AlignedRow`]s

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/pairscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod align;
mod bar;
mod bucketer;

pub use align::{AlignedRow, align, forward_fill, merge};
pub use bar::Bar;
pub use bucketer::{BarsBySymbol, TickBucketer, bucket_by_symbol, bucket_ticks};
