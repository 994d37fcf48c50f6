use chrono::{Datelike, NaiveDate};

use crate::errors::{Error, Result, ValidationError};

/// Earliest calendar year accepted for valuation and snapshot dates.
pub const MIN_SUPPORTED_YEAR: i32 = 1;

/// Latest calendar year accepted for valuation and snapshot dates.
///
/// Dates are stored as `YYYY-MM-DD` text and ordered as text, which only
/// matches calendar order for four-digit, non-negative years.
pub const MAX_SUPPORTED_YEAR: i32 = 9999;

/// Rejects dates whose year falls outside `MIN_SUPPORTED_YEAR..=MAX_SUPPORTED_YEAR`.
pub fn validate_date_range(field: &str, date: NaiveDate) -> Result<()> {
    if (MIN_SUPPORTED_YEAR..=MAX_SUPPORTED_YEAR).contains(&date.year()) {
        return Ok(());
    }
    Err(Error::Validation(ValidationError::InvalidInput(format!(
        "{} {} is outside the supported range 0001-01-01 to 9999-12-31",
        field, date
    ))))
}
