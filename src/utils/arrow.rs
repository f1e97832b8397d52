//! Column normalization for Arrow record batches
//!
//! Loaded batches arrive with whatever column order, naming and numeric types
//! the source file carries. The helpers here project them onto the canonical
//! schemas so the typed row conversion has a single shape to deal with.

use arrow::array::ArrayRef;
use arrow::compute::cast;
use arrow::record_batch::RecordBatch;
use arrow_schema::DataType;

use crate::error::{GrowthError, Result};
use crate::registry::schemas::{lms_schema, observations_schema};

/// Find the first of `aliases` present in the batch schema
pub fn find_column(batch: &RecordBatch, aliases: &[String]) -> Option<usize> {
    let schema = batch.schema();
    aliases
        .iter()
        .find_map(|alias| schema.index_of(alias).ok())
}

/// Cast a column to `to`, failing when any cell is null or does not convert
fn cast_required(batch: &RecordBatch, index: usize, to: &DataType) -> Result<ArrayRef> {
    let out = cast(batch.column(index), to)?;
    if out.null_count() > 0 {
        let schema = batch.schema();
        return Err(GrowthError::SchemaError(format!(
            "column '{}' contains nulls or non-numeric values",
            schema.field(index).name()
        )));
    }
    Ok(out)
}

/// Cast a column to `to`, keeping nulls for missing measurements
fn cast_optional(batch: &RecordBatch, index: usize, to: &DataType) -> Result<ArrayRef> {
    Ok(cast(batch.column(index), to)?)
}

/// Project a loaded LMS batch onto the canonical (Day, L, M, S) schema
pub fn normalize_lms_batch(batch: &RecordBatch, day_aliases: &[String]) -> Result<RecordBatch> {
    let day_index = find_column(batch, day_aliases)
        .ok_or_else(|| GrowthError::MissingColumn("Day".to_string()))?;
    let mut columns = vec![cast_required(batch, day_index, &DataType::Int64)?];
    for name in ["L", "M", "S"] {
        let index = batch
            .schema()
            .index_of(name)
            .map_err(|_| GrowthError::MissingColumn(name.to_string()))?;
        columns.push(cast_required(batch, index, &DataType::Float64)?);
    }
    Ok(RecordBatch::try_new(lms_schema(), columns)?)
}

/// Project a loaded observation batch onto the canonical (day, h, w, hc) schema
pub fn normalize_observations_batch(batch: &RecordBatch) -> Result<RecordBatch> {
    let schema = batch.schema();
    let day_index = schema
        .index_of("day")
        .map_err(|_| GrowthError::MissingColumn("day".to_string()))?;
    let mut columns = vec![cast_required(batch, day_index, &DataType::Int64)?];
    for name in ["h", "w", "hc"] {
        let index = schema
            .index_of(name)
            .map_err(|_| GrowthError::MissingColumn(name.to_string()))?;
        columns.push(cast_optional(batch, index, &DataType::Float64)?);
    }
    Ok(RecordBatch::try_new(observations_schema(), columns)?)
}
