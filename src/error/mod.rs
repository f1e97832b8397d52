//! Error handling for the growth percentile engine and its table loaders.

/// Specialized error type for growth percentile operations
#[derive(Debug, thiserror::Error)]
pub enum GrowthError {
    /// Error opening or reading a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Error processing Arrow data
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Error reading an Excel workbook
    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    /// Error converting between record batches and typed rows
    #[error("Row conversion error: {0}")]
    RowConversion(#[from] serde_arrow::Error),

    /// Malformed LMS parameters, or a value outside the transform's domain
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Day index outside the bounds of a reference table
    #[error("Day index {index} out of range for reference table with {len} rows")]
    IndexOutOfRange {
        /// The requested row position
        index: i64,
        /// Number of rows in the table
        len: usize,
    },

    /// A required column is absent from a tabular source
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Malformed source data (wrong cell types, non-monotonic day column, nulls)
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// Any other error, with context
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type for growth percentile operations
pub type Result<T> = std::result::Result<T, GrowthError>;
