//! Data sources for growth reference tables and observation uploads
//!
//! This module contains the loaders that feed the percentile engine. Each
//! source validates its columns up front and fails fast on malformed data;
//! the engine itself never sees an unvalidated table.
//!
//! Available sources:
//! - WHO reference tables: per-day LMS parameters, one file per
//!   (measure, sex) combination (wfa/lhfa/hcfa × boys/girls)
//! - Observation uploads: per-child measurement files with the columns
//!   {day, h, w, hc}

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use arrow::datatypes::SchemaRef;

use crate::error::Result;
use crate::models::ReferenceTable;

pub mod observations;
pub mod schemas;
pub mod store;
pub mod who;

pub use observations::{ObservationFile, ObservationSeries};
pub use store::TableStore;
pub use who::WhoTableSource;

/// Base trait for reference-table sources
pub trait TableSource: Send + Sync {
    /// Get the name of the source, for logging and error context
    fn source_name(&self) -> String;

    /// Get the canonical schema for this source
    fn schema(&self) -> SchemaRef;

    /// Load and validate the reference table
    ///
    /// # Arguments
    /// * `base_path` - Directory containing the table files
    ///
    /// # Returns
    /// * `Result<ReferenceTable>` - The validated table
    fn load(&self, base_path: &Path) -> Result<ReferenceTable> {
        // Check if we're already in a tokio runtime
        if tokio::runtime::Handle::try_current().is_ok() {
            // We're already in a tokio runtime, use futures executor
            futures::executor::block_on(self.load_async(base_path))
        } else {
            // Create a blocking runtime to run the async code
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(self.load_async(base_path))
        }
    }

    /// Load and validate the reference table asynchronously
    fn load_async<'a>(
        &'a self,
        base_path: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<ReferenceTable>> + Send + 'a>>;
}
