//! Error types for pairscope.

use thiserror::Error;

use crate::IntervalParseError;

/// Result type alias for pairscope operations.
pub type Result<T> = std::result::Result<T, PairscopeError>;

/// Broad classification of a failure, used by every boundary (HTTP, CLI)
/// to render a consistent response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The requested data does not exist.
    NotFound,
    /// The caller supplied unusable input.
    BadRequest,
    /// An unexpected failure on our side.
    Internal,
}

/// Errors that can occur while loading ticks and computing analytics.
///
/// Sparse data is not an error: too few rows, paired points or spread
/// observations produce undefined metrics instead.
#[derive(Error, Debug)]
pub enum PairscopeError {
    /// The tick store returned nothing.
    #[error("No data available in the database.")]
    DataUnavailable,

    /// A requested symbol is absent after bucketing.
    #[error("Selected symbol '{symbol}' not in resampled data.")]
    SymbolNotPresent {
        /// The missing symbol.
        symbol: String,
    },

    /// Bucketing failed.
    #[error("Error during data resampling: {0}")]
    Resampling(String),

    /// The interval specification could not be parsed.
    #[error("Error during data resampling: {0}")]
    InvalidInterval(#[from] IntervalParseError),

    /// A request parameter is out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A bulk upload could not be mapped to the tick schema.
    #[error("Upload rejected: {0}")]
    UploadValidation(String),

    /// The tick store failed.
    #[error("Store error: {0}")]
    Store(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output format error.
    #[error("Format error: {0}")]
    Format(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PairscopeError {
    /// Creates a symbol-not-present error.
    pub fn symbol_not_present(symbol: impl Into<String>) -> Self {
        Self::SymbolNotPresent {
            symbol: symbol.into(),
        }
    }

    /// Creates an upload validation error.
    pub fn upload(msg: impl Into<String>) -> Self {
        Self::UploadValidation(msg.into())
    }

    /// Creates a store error.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Returns the classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DataUnavailable => ErrorKind::NotFound,
            Self::SymbolNotPresent { .. }
            | Self::InvalidParameter(_)
            | Self::UploadValidation(_) => ErrorKind::BadRequest,
            Self::Resampling(_)
            | Self::InvalidInterval(_)
            | Self::Store(_)
            | Self::Io(_)
            | Self::Format(_)
            | Self::Json(_) => ErrorKind::Internal,
        }
    }
}
