//! Shared fixtures for integration tests
//!
//! Fixture files are written to a fresh directory under the system temp dir,
//! unique per test, so tests can run in parallel.

#![allow(dead_code)] // not every test crate uses every fixture

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

use arrow::datatypes::FieldRef;
use parquet::arrow::ArrowWriter;
use serde_arrow::schema::{SchemaLike, TracingOptions};

use growth_lms::{GrowthRecord, Measure, ReferenceRow, Sex};

static NEXT_FIXTURE: AtomicU32 = AtomicU32::new(0);

/// Create a fresh fixture directory
pub fn fixture_dir() -> PathBuf {
    let n = NEXT_FIXTURE.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("growth-lms-test-{}-{n}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("failed to create fixture directory");
    dir
}

/// Synthetic LMS rows: constant L and S, slowly rising median
pub fn sample_rows(len: usize) -> Vec<ReferenceRow> {
    (0..len)
        .map(|day| ReferenceRow {
            day: day as i64,
            l: 1.0,
            m: 3.3 + 0.01 * day as f64,
            s: 0.1,
        })
        .collect()
}

/// WHO-style file name for a (measure, sex) parquet table
pub fn table_file_name(measure: Measure, sex: Sex) -> String {
    format!(
        "{}-{}-percentiles-expanded-tables.parquet",
        measure.info().file_code,
        sex.table_code()
    )
}

/// Write rows as a WHO-named parquet table under `dir`
pub fn write_lms_parquet(
    dir: &Path,
    measure: Measure,
    sex: Sex,
    rows: &[ReferenceRow],
) -> PathBuf {
    let fields = Vec::<FieldRef>::from_samples(&rows, TracingOptions::default())
        .expect("failed to trace reference row schema");
    let batch = serde_arrow::to_record_batch(&fields, &rows).expect("failed to build batch");

    let path = dir.join(table_file_name(measure, sex));
    write_batch(&path, &batch);
    path
}

/// Write uploaded measurement records as a parquet file under `dir`
pub fn write_observations_parquet(dir: &Path, name: &str, records: &[GrowthRecord]) -> PathBuf {
    let fields = Vec::<FieldRef>::from_samples(
        &records,
        TracingOptions::default().allow_null_fields(true),
    )
    .expect("failed to trace growth record schema");
    let batch = serde_arrow::to_record_batch(&fields, &records).expect("failed to build batch");

    let path = dir.join(name);
    write_batch(&path, &batch);
    path
}

/// Write an arbitrary record batch as a parquet file
pub fn write_batch(path: &Path, batch: &arrow::record_batch::RecordBatch) {
    let file = std::fs::File::create(path).expect("failed to create fixture file");
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).expect("failed to create writer");
    writer.write(batch).expect("failed to write batch");
    writer.close().expect("failed to close writer");
}
