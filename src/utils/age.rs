//! Age conversion helpers

use chrono::NaiveDate;

use crate::error::{GrowthError, Result};

/// Age in whole days between a birth date and a reference date
///
/// The difference is floor-truncated to whole days. Fails when the birth date
/// lies after the reference date.
pub fn age_in_days(birth_date: NaiveDate, reference_date: NaiveDate) -> Result<i64> {
    if birth_date > reference_date {
        return Err(GrowthError::InvalidParameter(format!(
            "birth date {birth_date} is after reference date {reference_date}"
        )));
    }
    Ok((reference_date - birth_date).num_days())
}

/// Approximate age in months, rounded to one decimal
///
/// Uses the 30.5-day month convention of the growth charts.
#[must_use]
pub fn age_in_months(days: i64) -> f64 {
    (days as f64 / 30.5 * 10.0).round() / 10.0
}
