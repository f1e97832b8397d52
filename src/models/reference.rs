//! Typed LMS reference tables
//!
//! A reference table carries the per-day Box-Cox parameters (L, M, S) for one
//! (measure, sex) combination. Tables are validated on construction and
//! immutable afterwards; concurrent readers share one instance behind an `Arc`
//! without further synchronization.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::{GrowthError, Result};
use crate::models::{Measure, Sex};

/// Box-Cox parameter triple for one age-in-days
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LmsParams {
    /// Box-Cox power (lambda)
    pub l: f64,
    /// Median (mu)
    pub m: f64,
    /// Coefficient of variation (sigma)
    pub s: f64,
}

/// One row of a reference table: the LMS parameters for one age-in-days
///
/// Serializes with the WHO column names (Day, L, M, S).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRow {
    /// Age in days
    #[serde(rename = "Day")]
    pub day: i64,
    /// Box-Cox power (lambda)
    #[serde(rename = "L")]
    pub l: f64,
    /// Median (mu)
    #[serde(rename = "M")]
    pub m: f64,
    /// Coefficient of variation (sigma)
    #[serde(rename = "S")]
    pub s: f64,
}

impl ReferenceRow {
    /// The parameter triple of this row
    #[must_use]
    pub const fn params(&self) -> LmsParams {
        LmsParams {
            l: self.l,
            m: self.m,
            s: self.s,
        }
    }
}

/// Validated, immutable LMS reference table for one (measure, sex) combination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceTable {
    measure: Measure,
    sex: Sex,
    rows: Vec<ReferenceRow>,
}

impl ReferenceTable {
    /// Build a table from loaded rows, enforcing the table invariants
    ///
    /// Every row must carry finite parameters with strictly positive M and S
    /// (the transform divides by both). The day column must start at 0 and
    /// increase by exactly 1 per row, so that the row position of a day equals
    /// the day itself; `params_at` relies on this.
    pub fn new(measure: Measure, sex: Sex, rows: Vec<ReferenceRow>) -> Result<Self> {
        if rows.is_empty() {
            return Err(GrowthError::SchemaError(format!(
                "empty reference table for {measure} ({sex})"
            )));
        }
        if rows[0].day != 0 {
            return Err(GrowthError::SchemaError(format!(
                "reference table for {measure} ({sex}) starts at day {}, expected day 0",
                rows[0].day
            )));
        }
        for row in &rows {
            if !row.l.is_finite() || !row.m.is_finite() || !row.s.is_finite() {
                return Err(GrowthError::SchemaError(format!(
                    "non-finite LMS parameters at day {}: L={}, M={}, S={}",
                    row.day, row.l, row.m, row.s
                )));
            }
            if row.m <= 0.0 || row.s <= 0.0 {
                return Err(GrowthError::InvalidParameter(format!(
                    "non-positive M or S at day {}: M={}, S={}",
                    row.day, row.m, row.s
                )));
            }
        }
        for (prev, next) in rows.iter().tuple_windows() {
            if next.day != prev.day + 1 {
                return Err(GrowthError::SchemaError(format!(
                    "day column is not consecutive: day {} follows day {}",
                    next.day, prev.day
                )));
            }
        }
        Ok(Self { measure, sex, rows })
    }

    /// The measure this table describes
    #[must_use]
    pub const fn measure(&self) -> Measure {
        self.measure
    }

    /// The sex this table describes
    #[must_use]
    pub const fn sex(&self) -> Sex {
        self.sex
    }

    /// Number of rows (days) in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows (never true for a constructed table)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows, in day order
    #[must_use]
    pub fn rows(&self) -> &[ReferenceRow] {
        &self.rows
    }

    /// Largest day covered by the table
    #[must_use]
    pub fn max_day(&self) -> i64 {
        self.rows.len() as i64 - 1
    }

    /// LMS parameters at a zero-based row position
    ///
    /// `day` is interpreted as a positional index into the table, not matched
    /// against the stored day values; construction guarantees that row `i`
    /// holds the parameters for age-in-days `i`.
    pub fn params_at(&self, day: i64) -> Result<LmsParams> {
        let len = self.rows.len();
        if day < 0 || day as usize >= len {
            return Err(GrowthError::IndexOutOfRange { index: day, len });
        }
        Ok(self.rows[day as usize].params())
    }
}
