use std::str::FromStr;

use axum::extract::FromRequest;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use valuation_core::errors::Error as CoreError;
use valuation_core::pagination::PageRequest;
use valuation_core::utils::time_utils::validate_date_range;

use crate::error::{ApiError, ApiResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// JSON body extractor whose rejections answer with the usual error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Resolves the `page` and `rows` query parameters of a list endpoint.
pub fn page_request(page: Option<i64>, rows: Option<i64>) -> ApiResult<PageRequest> {
    Ok(PageRequest::from_params(page, rows)?)
}

/// A decimal sent either as a JSON string or as a JSON number.
///
/// JSON numbers keep their source text, so `123456789012.12345678` is not
/// squeezed through an `f64` on the way in.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DecimalInput {
    Text(String),
    Number(serde_json::Number),
}

impl DecimalInput {
    pub fn parse(&self) -> ApiResult<Decimal> {
        let raw = match self {
            DecimalInput::Text(text) => text.trim().to_string(),
            DecimalInput::Number(number) => number.to_string(),
        };
        // Numbers such as 1e-3 arrive in scientific notation.
        let value = Decimal::from_str(&raw)
            .or_else(|_| Decimal::from_scientific(&raw))
            .map_err(CoreError::from)?;
        Ok(value)
    }
}

pub fn parse_date(value: &str) -> ApiResult<NaiveDate> {
    let date = NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(CoreError::from)?;
    validate_date_range("Date", date)?;
    Ok(date)
}

pub fn parse_date_optional(value: Option<&str>) -> ApiResult<Option<NaiveDate>> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(parse_date)
        .transpose()
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Treats an empty query value the same as an absent one.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
