//! A Rust library for computing child growth percentiles against WHO LMS
//! reference tables, with schema validation and async loading.

pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod registry;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::TableLoaderConfig;
pub use error::{GrowthError, Result};
pub use models::{
    GrowthRecord, LmsParams, Measure, MeasureInfo, Observation, PercentileResult, ReferenceRow,
    ReferenceTable, Sex,
};

// Engine
pub use engine::{
    DistributionMode, compute_series, compute_series_parallel, percentile, standard_normal_score,
    z_score,
};

// Data sources
pub use registry::{ObservationFile, ObservationSeries, TableSource, TableStore, WhoTableSource};

// Arrow types
pub use arrow::datatypes::SchemaRef;
pub use arrow::record_batch::RecordBatch;

// Utility functions
pub use utils::age::{age_in_days, age_in_months};
