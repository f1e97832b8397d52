//! Arrow schema definitions for growth data sources

use std::sync::Arc;

use arrow_schema::{DataType, Field, Schema};

/// Get the canonical Arrow schema for an LMS reference table
///
/// Reference tables carry one row per age-in-days, already sorted, with row
/// `i` describing day `i`.
#[must_use]
pub fn lms_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("Day", DataType::Int64, false), // Age in days, row i = day i
        Field::new("L", DataType::Float64, false), // Box-Cox power
        Field::new("M", DataType::Float64, false), // Median
        Field::new("S", DataType::Float64, false), // Coefficient of variation
    ]))
}

/// Get the canonical Arrow schema for an uploaded observation file
#[must_use]
pub fn observations_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("day", DataType::Int64, false), // Age in days
        Field::new("h", DataType::Float64, true),  // Height (cm)
        Field::new("w", DataType::Float64, true),  // Weight (kg)
        Field::new("hc", DataType::Float64, true), // Head circumference (cm)
    ]))
}
