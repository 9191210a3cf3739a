//! Error handling for the analytics core.
//!
//! The algorithms themselves never fail: bad records are excluded from the
//! calculation that needs the broken field and counted in the data-quality
//! report. Errors only come from the edges of the crate, i.e. loading
//! episode files and validating configuration.

use std::io;
use std::path::PathBuf;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Specialized error type for `ward-metrics`
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    /// Error opening or reading a file
    #[error("IO error for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Error decoding JSON episode records or configuration
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error reading Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error processing Arrow arrays
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Column present but with an unusable type, or required column missing
    #[error("Schema error in column '{column}': {message}")]
    Schema { column: String, message: String },

    /// Configuration values that cannot produce a meaningful report
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Input file with an extension the loader does not understand
    #[error("Unsupported episode file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

impl AnalyticsError {
    /// Wrap an IO error together with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn schema(column: &str, message: impl Into<String>) -> Self {
        Self::Schema {
            column: column.to_string(),
            message: message.into(),
        }
    }
}

/// Result type for `ward-metrics` operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;
