//! Tick storage for pairscope.
//!
//! - [`TickSource`] / [`TickSink`] - Read-only snapshot and append interfaces
//! - [`SqliteTickStore`] - SQLite-backed store
//! - [`MemoryTickStore`] - In-memory store
//! - [`ingest_csv`] - Bulk CSV upload with column aliases

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/pairscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod memory;
mod source;
mod sqlite;
mod timestamp;
mod upload;

pub use config::{DB_FILE_NAME, DEFAULT_SNAPSHOT_LIMIT, StoreConfig};
pub use memory::MemoryTickStore;
pub use source::{TickSink, TickSource, TickStore, analyze_source};
pub use sqlite::SqliteTickStore;
pub use timestamp::{format_timestamp, parse_epoch, parse_timestamp};
pub use upload::{ColumnMap, ParsedUpload, UploadSummary, check_file_name, ingest_csv, parse_csv};
