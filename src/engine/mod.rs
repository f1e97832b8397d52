//! LMS percentile engine
//!
//! Implements the Cole & Green LMS method: a raw measurement is standardized
//! to a z-score through the per-age Box-Cox parameters (L, M, S) and mapped
//! through the standard normal distribution to a cumulative percentile.
//!
//! Every operation here is a pure function of its explicit inputs; there is no
//! shared state and no recovery from errors. A failing observation aborts a
//! whole batch so that a partially-correct series is never presented as
//! complete.

use rayon::prelude::*;
use statrs::distribution::{Continuous, ContinuousCDF, Normal};

use crate::error::{GrowthError, Result};
use crate::models::{LmsParams, Observation, PercentileResult, ReferenceTable};

/// Standard normal distribution for CDF/PDF calculations.
fn std_normal() -> Normal {
    Normal::new(0.0, 1.0).unwrap()
}

/// How a z-score is mapped to a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionMode {
    /// Cumulative distribution: Φ(z)·100, a percentile in (0, 100)
    Cumulative,
    /// Probability density: φ(z)·100, a diagnostic value, not a percentile
    Density,
}

/// Convert a raw measurement into an LMS z-score
///
/// Uses z = ((value/M)^L − 1) / (L·S) for L ≠ 0 and the logarithmic limit
/// z = ln(value/M) / S for L = 0.
pub fn z_score(value: f64, params: LmsParams) -> Result<f64> {
    let LmsParams { l, m, s } = params;
    if m <= 0.0 || s <= 0.0 {
        return Err(GrowthError::InvalidParameter(format!(
            "LMS transform requires M > 0 and S > 0, got M={m}, S={s}"
        )));
    }
    if l == 0.0 {
        if value <= 0.0 {
            return Err(GrowthError::InvalidParameter(format!(
                "measurement must be positive when L = 0, got {value}"
            )));
        }
        return Ok((value / m).ln() / s);
    }
    if value <= 0.0 && l.fract() != 0.0 {
        return Err(GrowthError::InvalidParameter(format!(
            "fractional power of a non-positive measurement is undefined: value={value}, L={l}"
        )));
    }
    Ok(((value / m).powf(l) - 1.0) / (l * s))
}

/// Map a measurement to a percentile or a scaled probability density
///
/// In `Cumulative` mode the result is Φ(z)·100, a percentile in (0, 100). In
/// `Density` mode it is φ(z)·100, scaled the same way only for symmetry with
/// the cumulative path; callers should treat it as diagnostic output.
pub fn standard_normal_score(
    value: f64,
    params: LmsParams,
    mode: DistributionMode,
) -> Result<f64> {
    let z = z_score(value, params)?;
    let normal = std_normal();
    let result = match mode {
        DistributionMode::Cumulative => normal.cdf(z),
        DistributionMode::Density => normal.pdf(z),
    };
    Ok(result * 100.0)
}

/// Percentile for a single observation against a reference table
///
/// `day` is the positional row index into the table (see
/// [`ReferenceTable::params_at`]). Errors from the lookup and the transform
/// propagate unchanged.
pub fn percentile(value: f64, table: &ReferenceTable, day: i64) -> Result<f64> {
    let params = table.params_at(day)?;
    standard_normal_score(value, params, DistributionMode::Cumulative)
}

/// Percentile series over a chronological observation series
///
/// Results preserve input order. The first failing observation aborts the
/// whole batch; no partial series is returned. Callers are responsible for
/// pre-filtering observations whose day exceeds the table's range.
pub fn compute_series(
    table: &ReferenceTable,
    observations: &[Observation],
) -> Result<Vec<PercentileResult>> {
    observations
        .iter()
        .map(|obs| {
            percentile(obs.value, table, obs.day).map(|p| PercentileResult {
                day: obs.day,
                value: obs.value,
                percentile: p,
            })
        })
        .collect()
}

/// Parallel variant of [`compute_series`]
///
/// Observations are independent, so the batch is computed across threads.
/// Result order still matches input order, and the whole batch still fails on
/// the first invalid observation.
pub fn compute_series_parallel(
    table: &ReferenceTable,
    observations: &[Observation],
) -> Result<Vec<PercentileResult>> {
    observations
        .par_iter()
        .map(|obs| {
            percentile(obs.value, table, obs.day).map(|p| PercentileResult {
                day: obs.day,
                value: obs.value,
                percentile: p,
            })
        })
        .collect()
}
