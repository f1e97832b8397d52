//! Observation and result records

use serde::{Deserialize, Serialize};

use crate::models::Measure;

/// A single measurement of a child at a given age-in-days
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Age in days at the time of measurement
    pub day: i64,
    /// Measured value, in the unit of the selected measure
    pub value: f64,
}

/// One row of an uploaded measurement file, prior to interpolation
///
/// Individual values may be missing; the upload loader fills interior gaps by
/// linear interpolation before the records reach the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthRecord {
    /// Age in days
    pub day: i64,
    /// Height in cm, if recorded
    pub h: Option<f64>,
    /// Weight in kg, if recorded
    pub w: Option<f64>,
    /// Head circumference in cm, if recorded
    pub hc: Option<f64>,
}

impl GrowthRecord {
    /// Value of the column tracked by `measure`, if recorded
    #[must_use]
    pub const fn value_for(&self, measure: Measure) -> Option<f64> {
        match measure {
            Measure::Weight => self.w,
            Measure::Height => self.h,
            Measure::HeadCircumference => self.hc,
        }
    }
}

/// Percentile computed for one observation
///
/// Derived on demand, never stored or mutated once produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentileResult {
    /// Age in days of the underlying observation
    pub day: i64,
    /// The measured value
    pub value: f64,
    /// Cumulative percentile in [0, 100]
    pub percentile: f64,
}
