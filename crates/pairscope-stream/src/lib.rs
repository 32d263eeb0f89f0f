//! Live trade-feed ingestion for pairscope.
//!
//! - [`StreamConfig`] - Endpoint, symbols and timing of the feed
//! - [`parse_trade_message`] - Converts a trade payload to a [`Tick`](pairscope_types::Tick)
//! - [`run_ingestion`] - Reconnecting ingestion loop

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/pairscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod ingest;
mod message;

pub use config::{DEFAULT_STREAM_URL, DEFAULT_SYMBOLS, StreamConfig};
pub use ingest::{IngestSummary, StreamError, run_ingestion};
pub use message::parse_trade_message;
