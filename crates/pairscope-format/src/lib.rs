//! Output formatters for pairscope analytics reports.
//!
//! - [`CsvFormatter`] - CSV export with a trailing `ADF p-value` column
//! - [`JsonFormatter`] - JSON array or NDJSON chart records
//! - [`ParquetFormatter`] - Apache Parquet columnar format

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/pairscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod json;

#[cfg(feature = "parquet")]
mod parquet;

pub use crate::csv::{ADF_COLUMN, CsvFormatter};
pub use formatter::{FormatError, Formatter, OutputFormat, export_file_name};
pub use json::{JsonFormatter, JsonStyle};

#[cfg(feature = "parquet")]
pub use crate::parquet::ParquetFormatter;
