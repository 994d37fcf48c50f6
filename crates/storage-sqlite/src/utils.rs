//! Utility functions for SQLite storage operations.
//!
//! SQLite has no exact decimal or date type, so decimals and calendar dates are
//! stored as TEXT. These helpers do the conversions in one place.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::StorageError;
use valuation_core::Result;

/// Storage format of calendar dates. Sorts lexicographically in date order.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Escape character used in LIKE patterns built by [`like_pattern`].
pub const LIKE_ESCAPE: char = '\\';

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(column: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| {
        StorageError::SerializationError(format!(
            "Invalid date '{}' in column {}: {}",
            value, column, e
        ))
        .into()
    })
}

pub fn parse_decimal(column: &str, value: &str) -> Result<Decimal> {
    Decimal::from_str(value).map_err(|e| {
        StorageError::SerializationError(format!(
            "Invalid decimal '{}' in column {}: {}",
            value, column, e
        ))
        .into()
    })
}

/// Builds a `%term%` pattern for a substring LIKE, escaping `%`, `_` and the
/// escape character itself.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
