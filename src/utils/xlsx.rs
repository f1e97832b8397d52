//! Excel workbook reading helpers
//!
//! The WHO publishes the expanded LMS tables as .xlsx workbooks, and uploaded
//! measurement files commonly arrive in the same format. Only the first
//! worksheet of a workbook is read; the first row is treated as the header.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};

use crate::error::{GrowthError, Result};

/// Read the first worksheet of a workbook into a header row and data rows
pub fn read_first_sheet(path: &Path) -> Result<(Vec<String>, Vec<Vec<Data>>)> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .ok_or_else(|| {
            GrowthError::SchemaError(format!("no worksheets in {}", path.display()))
        })?
        .clone();
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| GrowthError::SchemaError(format!("empty worksheet in {}", path.display())))?
        .iter()
        .map(|cell| cell_to_string(cell).trim().to_string())
        .collect();
    let data = rows.map(<[Data]>::to_vec).collect();

    Ok((header, data))
}

/// Numeric cell contents, `None` for empty cells
pub fn cell_as_f64(cell: &Data) -> Result<Option<f64>> {
    match cell {
        Data::Empty => Ok(None),
        Data::Float(f) => Ok(Some(*f)),
        Data::Int(i) => Ok(Some(*i as f64)),
        Data::String(s) if s.trim().is_empty() => Ok(None),
        Data::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| GrowthError::SchemaError(format!("non-numeric cell: {s:?}"))),
        other => Err(GrowthError::SchemaError(format!(
            "non-numeric cell: {other:?}"
        ))),
    }
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
    }
}
