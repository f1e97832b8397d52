//! Uploaded observation files
//!
//! An upload carries one row per recorded day with the columns
//! {day, h, w, hc}. Values may be missing for individual days; interior gaps
//! are filled by linear interpolation per column before the records reach the
//! engine, which assumes gap-free input. A gap at the start or end of a
//! column cannot be interpolated and only fails when that measure is
//! requested.

use std::fs::File;
use std::path::Path;
use std::time::Instant;

use arrow::compute::concat_batches;
use arrow::datatypes::SchemaRef;
use itertools::Itertools;
use parquet::arrow::ProjectionMask;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::config::TableLoaderConfig;
use crate::error::{GrowthError, Result};
use crate::models::{GrowthRecord, Measure, Observation};
use crate::registry::schemas::observations_schema;
use crate::utils::arrow::normalize_observations_batch;
use crate::utils::xlsx::{cell_as_f64, read_first_sheet};
use crate::utils::{log_operation_complete, log_operation_start};

/// Columns an upload must carry
const REQUIRED_COLUMNS: [&str; 4] = ["day", "h", "w", "hc"];

/// Loader for uploaded measurement files
#[derive(Debug, Clone)]
pub struct ObservationFile {
    config: TableLoaderConfig,
    schema: SchemaRef,
}

impl Default for ObservationFile {
    fn default() -> Self {
        Self::new()
    }
}

impl ObservationFile {
    /// Create a loader with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TableLoaderConfig::default())
    }

    /// Create a loader with an explicit configuration
    #[must_use]
    pub fn with_config(config: TableLoaderConfig) -> Self {
        Self {
            config,
            schema: observations_schema(),
        }
    }

    /// Get the canonical schema for uploads
    #[must_use]
    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    /// Load, validate and interpolate an uploaded measurement file
    pub fn load(&self, path: &Path) -> Result<ObservationSeries> {
        log_operation_start("Loading observation upload", path);
        let start = Instant::now();

        let records = match path.extension().and_then(|ext| ext.to_str()) {
            Some("parquet") => read_parquet_records(path, &self.config),
            Some("xlsx" | "xls") => read_workbook_records(path),
            other => Err(GrowthError::SchemaError(format!(
                "unsupported observation format {other:?} for {}",
                path.display()
            ))),
        }?;
        let series = ObservationSeries::from_records(records)?;

        log_operation_complete("loaded", path, series.len(), Some(start.elapsed()));
        Ok(series)
    }

    /// Load an uploaded measurement file asynchronously
    pub async fn load_async(&self, path: &Path) -> Result<ObservationSeries> {
        tokio::fs::metadata(path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to access path {}: {}", path.display(), e))?;

        let loader = self.clone();
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || loader.load(&path))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }
}

/// Chronological, validated series of uploaded records
#[derive(Debug, Clone)]
pub struct ObservationSeries {
    records: Vec<GrowthRecord>,
}

impl ObservationSeries {
    /// Validate uploaded records and interpolate interior gaps
    ///
    /// The day column must be non-negative and strictly increasing. Each
    /// measurement column is interpolated linearly between its recorded
    /// neighbours; values before the first or after the last recorded entry
    /// of a column stay missing.
    pub fn from_records(mut records: Vec<GrowthRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(GrowthError::SchemaError(
                "observation upload has no data rows".to_string(),
            ));
        }
        if records[0].day < 0 {
            return Err(GrowthError::SchemaError(format!(
                "negative day {} in observation upload",
                records[0].day
            )));
        }
        for (prev, next) in records.iter().tuple_windows() {
            if next.day <= prev.day {
                return Err(GrowthError::SchemaError(format!(
                    "day column is not strictly increasing: day {} follows day {}",
                    next.day, prev.day
                )));
            }
        }

        interpolate_column(&mut records, |r| r.h, |r, v| r.h = Some(v));
        interpolate_column(&mut records, |r| r.w, |r, v| r.w = Some(v));
        interpolate_column(&mut records, |r| r.hc, |r, v| r.hc = Some(v));

        Ok(Self { records })
    }

    /// All records, in day order
    #[must_use]
    pub fn records(&self) -> &[GrowthRecord] {
        &self.records
    }

    /// Number of records in the series
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the series has no records (never true for a constructed series)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Gap-free observations for the selected measure
    ///
    /// Fails when any record still has no value for the measure after
    /// interpolation, or carries a non-positive measurement.
    pub fn observations_for(&self, measure: Measure) -> Result<Vec<Observation>> {
        self.records
            .iter()
            .map(|record| {
                let value = record.value_for(measure).ok_or_else(|| {
                    GrowthError::SchemaError(format!(
                        "no '{}' measurement for day {} after interpolation",
                        measure.info().column,
                        record.day
                    ))
                })?;
                if value <= 0.0 {
                    return Err(GrowthError::InvalidParameter(format!(
                        "non-positive '{}' measurement {value} on day {}",
                        measure.info().column,
                        record.day
                    )));
                }
                Ok(Observation {
                    day: record.day,
                    value,
                })
            })
            .collect()
    }
}

/// Fill interior gaps of one measurement column by linear interpolation
fn interpolate_column<G, S>(records: &mut [GrowthRecord], get: G, mut set: S)
where
    G: Fn(&GrowthRecord) -> Option<f64>,
    S: FnMut(&mut GrowthRecord, f64),
{
    let known: Vec<(usize, i64, f64)> = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| get(record).map(|value| (index, record.day, value)))
        .collect();

    for (&(a, day_a, value_a), &(b, day_b, value_b)) in known.iter().tuple_windows() {
        for index in a + 1..b {
            let t = (records[index].day - day_a) as f64 / (day_b - day_a) as f64;
            set(&mut records[index], value_a + t * (value_b - value_a));
        }
    }
}

/// Read an uploaded parquet measurement file
fn read_parquet_records(path: &Path, config: &TableLoaderConfig) -> Result<Vec<GrowthRecord>> {
    let file = File::open(path).map_err(|e| {
        GrowthError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to open {}: {e}", path.display()),
        ))
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let file_schema = builder.schema().clone();
    let mut indices = Vec::with_capacity(REQUIRED_COLUMNS.len());
    for name in REQUIRED_COLUMNS {
        indices.push(
            file_schema
                .index_of(name)
                .map_err(|_| GrowthError::MissingColumn(name.to_string()))?,
        );
    }
    let projection = ProjectionMask::leaves(builder.parquet_schema(), indices);

    let reader = builder
        .with_batch_size(config.batch_size)
        .with_projection(projection)
        .build()?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    if batches.is_empty() {
        return Ok(Vec::new());
    }

    let batch = concat_batches(&batches[0].schema(), &batches)?;
    let batch = normalize_observations_batch(&batch)?;
    let records: Vec<GrowthRecord> = serde_arrow::from_record_batch(&batch)?;
    Ok(records)
}

/// Read an uploaded Excel measurement file
fn read_workbook_records(path: &Path) -> Result<Vec<GrowthRecord>> {
    let (header, data) = read_first_sheet(path)?;

    let mut indices = [0_usize; 4];
    for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| GrowthError::MissingColumn(name.to_string()))?;
    }
    let [day_index, h_index, w_index, hc_index] = indices;

    data.iter()
        .enumerate()
        .map(|(row_number, row)| {
            let day = row
                .get(day_index)
                .map_or(Ok(None), cell_as_f64)?
                .ok_or_else(|| {
                    GrowthError::SchemaError(format!("missing 'day' value in data row {row_number}"))
                })?;
            if day.fract() != 0.0 {
                return Err(GrowthError::SchemaError(format!(
                    "non-integer day {day} in data row {row_number}"
                )));
            }
            Ok(GrowthRecord {
                day: day as i64,
                h: row.get(h_index).map_or(Ok(None), cell_as_f64)?,
                w: row.get(w_index).map_or(Ok(None), cell_as_f64)?,
                hc: row.get(hc_index).map_or(Ok(None), cell_as_f64)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(day: i64, w: Option<f64>) -> GrowthRecord {
        GrowthRecord {
            day,
            h: None,
            w,
            hc: None,
        }
    }

    #[test]
    fn interior_gaps_are_interpolated_linearly() {
        let records = vec![
            record(0, Some(3.0)),
            record(1, None),
            record(2, None),
            record(3, Some(6.0)),
        ];
        let series = ObservationSeries::from_records(records).unwrap();
        let observations = series.observations_for(Measure::Weight).unwrap();
        let values: Vec<f64> = observations.iter().map(|o| o.value).collect();
        assert_eq!(values, vec![3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn interpolation_respects_uneven_day_spacing() {
        let records = vec![record(0, Some(2.0)), record(5, None), record(10, Some(4.0))];
        let series = ObservationSeries::from_records(records).unwrap();
        let observations = series.observations_for(Measure::Weight).unwrap();
        assert!((observations[1].value - 3.0).abs() < 1e-12);
    }

    #[test]
    fn boundary_gaps_fail_only_for_the_affected_measure() {
        let records = vec![
            GrowthRecord {
                day: 0,
                h: Some(50.0),
                w: None,
                hc: Some(34.0),
            },
            GrowthRecord {
                day: 1,
                h: Some(50.1),
                w: Some(3.4),
                hc: Some(34.1),
            },
        ];
        let series = ObservationSeries::from_records(records).unwrap();
        assert!(series.observations_for(Measure::Height).is_ok());
        assert!(matches!(
            series.observations_for(Measure::Weight),
            Err(GrowthError::SchemaError(_))
        ));
    }

    #[test]
    fn non_increasing_days_are_rejected() {
        let records = vec![record(3, Some(3.0)), record(3, Some(3.1))];
        assert!(matches!(
            ObservationSeries::from_records(records),
            Err(GrowthError::SchemaError(_))
        ));
    }
}
