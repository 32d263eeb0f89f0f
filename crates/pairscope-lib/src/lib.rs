//! Pairs-trading spread analytics over tick data.
//!
//! This is a facade crate that re-exports functionality from the pairscope
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use pairscope_lib::prelude::*;
//!
//! let store = SqliteTickStore::from_config(&StoreConfig::default())?;
//! let request = AnalyticsRequest::new("BTCUSDT", "ETHUSDT")
//!     .with_interval(Interval::minutes(5))
//!     .with_stationarity(true);
//! let report = analyze_source(&store, DEFAULT_SNAPSHOT_LIMIT, &request)?;
//! println!("z = {:?}", report.metrics.z_latest);
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/pairscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use pairscope_types::*;

// Re-export bucketing and alignment
pub use pairscope_aggregate::{AlignedRow, Bar, BarsBySymbol, TickBucketer, align, bucket_by_symbol};

// Re-export analytics
pub use pairscope_analytics::{
    AdfResult, AnalyticsReport, AnalyticsRequest, AnalyticsResponse, AnnotatedRow, ChartRecord,
    DEFAULT_WINDOW, HedgeEstimate, Metric, Metrics, adf_test, estimate_hedge, run_analytics,
};

// Re-export storage
#[cfg(feature = "store")]
pub use pairscope_store::{
    DEFAULT_SNAPSHOT_LIMIT, MemoryTickStore, SqliteTickStore, StoreConfig, TickSink, TickSource,
    TickStore, UploadSummary, analyze_source, ingest_csv,
};

// Re-export formatters
#[cfg(feature = "format")]
pub use pairscope_format::{
    CsvFormatter, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat, export_file_name,
};

#[cfg(all(feature = "format", feature = "parquet"))]
pub use pairscope_format::ParquetFormatter;

// Re-export live ingestion
#[cfg(feature = "stream")]
pub use pairscope_stream::{DEFAULT_STREAM_URL, IngestSummary, StreamConfig, run_ingestion};

// Re-export HTTP service
#[cfg(feature = "server")]
pub use pairscope_server::{
    AppState, DEFAULT_BIND, DEFAULT_CORS_ORIGIN, DEFAULT_PORT, ServerConfig, serve,
};

/// Prelude module for convenient imports.
///
/// ```
/// use pairscope_lib::prelude::*;
/// ```
pub mod prelude {
    pub use pairscope_types::{Interval, PairscopeError, RegressionType, Result, Tick};

    pub use pairscope_analytics::{
        AnalyticsReport, AnalyticsRequest, Metric, Metrics, run_analytics,
    };

    #[cfg(feature = "store")]
    pub use pairscope_store::{
        DEFAULT_SNAPSHOT_LIMIT, MemoryTickStore, SqliteTickStore, StoreConfig, TickSink,
        TickSource, analyze_source,
    };

    #[cfg(feature = "format")]
    pub use pairscope_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat};

    #[cfg(all(feature = "format", feature = "parquet"))]
    pub use pairscope_format::ParquetFormatter;

    #[cfg(feature = "stream")]
    pub use pairscope_stream::StreamConfig;

    #[cfg(feature = "server")]
    pub use pairscope_server::ServerConfig;
}
