//! Configuration for the table loaders.

/// Configuration shared by the reference-table and observation loaders
#[derive(Debug, Clone)]
pub struct TableLoaderConfig {
    /// Batch size for reading Parquet files
    pub batch_size: usize,
    /// Accepted names for the age-in-days column, tried in order
    ///
    /// The WHO workbooks label the column "Age" in some releases and "Day" in
    /// others; both describe the same zero-based day index.
    pub day_column_aliases: Vec<String>,
}

impl Default for TableLoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 16384,
            day_column_aliases: vec!["Day".to_string(), "Age".to_string()],
        }
    }
}
