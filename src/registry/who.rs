//! WHO growth-standard table source
//!
//! Reference tables follow the naming of the published WHO workbooks:
//! `{code}-{boys|girls}-percentiles-expanded-tables.{parquet|xlsx}`, one file
//! per (measure, sex) combination. The expanded workbooks carry the LMS
//! columns alongside precomputed percentile curves; only the day column and
//! L, M, S are read here.

use std::fs::File;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::Instant;

use arrow::compute::concat_batches;
use arrow::datatypes::SchemaRef;
use parquet::arrow::ProjectionMask;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::config::TableLoaderConfig;
use crate::error::{GrowthError, Result};
use crate::models::{Measure, ReferenceRow, ReferenceTable, Sex};
use crate::registry::TableSource;
use crate::registry::schemas::lms_schema;
use crate::utils::arrow::normalize_lms_batch;
use crate::utils::xlsx::{cell_as_f64, read_first_sheet};
use crate::utils::{log_operation_complete, log_operation_start};

/// WHO reference-table source for one (measure, sex) combination
#[derive(Debug, Clone)]
pub struct WhoTableSource {
    measure: Measure,
    sex: Sex,
    config: TableLoaderConfig,
    schema: SchemaRef,
}

impl WhoTableSource {
    /// Create a source with the default loader configuration
    #[must_use]
    pub fn new(measure: Measure, sex: Sex) -> Self {
        Self::with_config(measure, sex, TableLoaderConfig::default())
    }

    /// Create a source with an explicit loader configuration
    #[must_use]
    pub fn with_config(measure: Measure, sex: Sex, config: TableLoaderConfig) -> Self {
        Self {
            measure,
            sex,
            config,
            schema: lms_schema(),
        }
    }

    /// The measure this source loads tables for
    #[must_use]
    pub const fn measure(&self) -> Measure {
        self.measure
    }

    /// The sex this source loads tables for
    #[must_use]
    pub const fn sex(&self) -> Sex {
        self.sex
    }

    /// File stem of this combination's table, per the WHO naming
    #[must_use]
    pub fn file_stem(&self) -> String {
        format!(
            "{}-{}-percentiles-expanded-tables",
            self.measure.info().file_code,
            self.sex.table_code()
        )
    }

    /// Locate the table file under `base_path`, preferring parquet over xlsx
    fn resolve_path(&self, base_path: &Path) -> Result<PathBuf> {
        let stem = self.file_stem();
        for ext in ["parquet", "xlsx", "xls"] {
            let candidate = base_path.join(format!("{stem}.{ext}"));
            if candidate.exists() {
                return Ok(candidate);
            }
        }
        Err(GrowthError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!(
                "no reference table named {stem}.parquet or {stem}.xlsx in {}",
                base_path.display()
            ),
        )))
    }

    fn load_blocking(&self, base_path: &Path) -> Result<ReferenceTable> {
        let path = self.resolve_path(base_path)?;
        log_operation_start("Loading reference table", &path);
        let start = Instant::now();

        let rows = load_rows(&path, &self.config)?;
        let table = ReferenceTable::new(self.measure, self.sex, rows)?;

        log_operation_complete("loaded", &path, table.len(), Some(start.elapsed()));
        Ok(table)
    }
}

impl TableSource for WhoTableSource {
    fn source_name(&self) -> String {
        self.file_stem()
    }

    fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    fn load_async<'a>(
        &'a self,
        base_path: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<ReferenceTable>> + Send + 'a>> {
        Box::pin(async move {
            tokio::fs::metadata(base_path).await.map_err(|e| {
                anyhow::anyhow!("Failed to access path {}: {}", base_path.display(), e)
            })?;

            let source = self.clone();
            let base = base_path.to_path_buf();
            tokio::task::spawn_blocking(move || source.load_blocking(&base))
                .await
                .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
        })
    }
}

fn load_rows(path: &Path, config: &TableLoaderConfig) -> Result<Vec<ReferenceRow>> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("parquet") => read_parquet_rows(path, config),
        Some("xlsx" | "xls") => read_workbook_rows(path, config),
        other => Err(GrowthError::SchemaError(format!(
            "unsupported reference table format {other:?} for {}",
            path.display()
        ))),
    }
}

/// Read the LMS columns of a parquet reference table
fn read_parquet_rows(path: &Path, config: &TableLoaderConfig) -> Result<Vec<ReferenceRow>> {
    let file = File::open(path).map_err(|e| {
        GrowthError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to open {}: {e}", path.display()),
        ))
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    // Project to the day column plus L/M/S; the expanded tables carry many
    // percentile columns the engine never reads.
    let file_schema = builder.schema().clone();
    let day_index = config
        .day_column_aliases
        .iter()
        .find_map(|alias| file_schema.index_of(alias).ok())
        .ok_or_else(|| GrowthError::MissingColumn("Day".to_string()))?;
    let mut indices = vec![day_index];
    for name in ["L", "M", "S"] {
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
    let batch = normalize_lms_batch(&batch, &config.day_column_aliases)?;
    let rows: Vec<ReferenceRow> = serde_arrow::from_record_batch(&batch)?;
    Ok(rows)
}

/// Read the LMS columns of an Excel reference table
fn read_workbook_rows(path: &Path, config: &TableLoaderConfig) -> Result<Vec<ReferenceRow>> {
    let (header, data) = read_first_sheet(path)?;

    let day_index = config
        .day_column_aliases
        .iter()
        .find_map(|alias| header.iter().position(|h| h == alias))
        .ok_or_else(|| GrowthError::MissingColumn("Day".to_string()))?;
    let mut indices = [day_index, 0, 0, 0];
    for (slot, name) in indices.iter_mut().skip(1).zip(["L", "M", "S"]) {
        *slot = header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| GrowthError::MissingColumn(name.to_string()))?;
    }

    data.iter()
        .enumerate()
        .map(|(row_number, row)| {
            let mut cells = [0.0_f64; 4];
            for (value, index) in cells.iter_mut().zip(indices) {
                *value = row
                    .get(index)
                    .map_or(Ok(None), cell_as_f64)?
                    .ok_or_else(|| {
                        GrowthError::SchemaError(format!(
                            "missing '{}' value in data row {row_number}",
                            header[index]
                        ))
                    })?;
            }
            let [day, l, m, s] = cells;
            if day.fract() != 0.0 {
                return Err(GrowthError::SchemaError(format!(
                    "non-integer day {day} in data row {row_number}"
                )));
            }
            Ok(ReferenceRow {
                day: day as i64,
                l,
                m,
                s,
            })
        })
        .collect()
}
