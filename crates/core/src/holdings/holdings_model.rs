//! Holding domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    MAX_DECIMAL_DIGITS, MAX_NAME_LENGTH, QUANTITY_DECIMAL_PLACES, UNIT_PRICE_DECIMAL_PLACES,
};
use crate::utils::time_utils::validate_date_range;
use crate::{errors::ValidationError, Error, Result};

/// Closed set of asset classes a holding can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    Stock,
    Bond,
    Cash,
    Etf,
    MutualFund,
    Other,
}

impl AssetType {
    pub const ALL: [AssetType; 6] = [
        AssetType::Stock,
        AssetType::Bond,
        AssetType::Cash,
        AssetType::Etf,
        AssetType::MutualFund,
        AssetType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Stock => "STOCK",
            AssetType::Bond => "BOND",
            AssetType::Cash => "CASH",
            AssetType::Etf => "ETF",
            AssetType::MutualFund => "MUTUAL_FUND",
            AssetType::Other => "OTHER",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AssetType::ALL
            .into_iter()
            .find(|asset_type| asset_type.as_str() == s)
            .ok_or_else(|| Error::Validation(ValidationError::InvalidAssetType(s.to_string())))
    }
}

/// A position in one asset, priced as of its valuation date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: String,
    pub portfolio_id: String,
    pub asset_name: String,
    pub asset_type: AssetType,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub valuation_date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Holding {
    /// Market value of the position, unrounded.
    pub fn total_value(&self) -> Decimal {
        self.quantity * self.unit_price
    }

    pub fn checked_total_value(&self) -> Option<Decimal> {
        self.quantity.checked_mul(self.unit_price)
    }
}

/// Input model for creating a new holding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHolding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub portfolio_id: String,
    pub asset_name: String,
    pub asset_type: AssetType,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub valuation_date: NaiveDate,
}

impl NewHolding {
    /// Validates the new holding data.
    pub fn validate(&self) -> Result<()> {
        if self.portfolio_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "portfolioId".to_string(),
            )));
        }
        validate_holding_values(
            &self.asset_name,
            self.quantity,
            self.unit_price,
            self.valuation_date,
        )
    }
}

/// Partial update for a holding. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingUpdate {
    pub id: String,
    pub portfolio_id: Option<String>,
    pub asset_name: Option<String>,
    pub asset_type: Option<AssetType>,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub valuation_date: Option<NaiveDate>,
}

impl HoldingUpdate {
    /// Applies the present fields onto a stored holding and validates the result.
    pub fn apply_to(self, holding: &mut Holding) -> Result<()> {
        if let Some(portfolio_id) = self.portfolio_id {
            holding.portfolio_id = portfolio_id;
        }
        if let Some(asset_name) = self.asset_name {
            holding.asset_name = asset_name;
        }
        if let Some(asset_type) = self.asset_type {
            holding.asset_type = asset_type;
        }
        if let Some(quantity) = self.quantity {
            holding.quantity = quantity;
        }
        if let Some(unit_price) = self.unit_price {
            holding.unit_price = unit_price;
        }
        if let Some(valuation_date) = self.valuation_date {
            holding.valuation_date = valuation_date;
        }
        validate_holding_values(
            &holding.asset_name,
            holding.quantity,
            holding.unit_price,
            holding.valuation_date,
        )
    }
}

/// Filters for listing holdings. `None` means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingFilter {
    pub portfolio_id: Option<String>,
    pub valuation_date: Option<NaiveDate>,
}

fn validate_holding_values(
    asset_name: &str,
    quantity: Decimal,
    unit_price: Decimal,
    valuation_date: NaiveDate,
) -> Result<()> {
    if asset_name.trim().is_empty() {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "Asset name cannot be empty".to_string(),
        )));
    }
    if asset_name.chars().count() > MAX_NAME_LENGTH {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Asset name cannot be longer than {} characters",
            MAX_NAME_LENGTH
        ))));
    }
    if quantity <= Decimal::ZERO {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "Quantity must be greater than zero".to_string(),
        )));
    }
    if unit_price <= Decimal::ZERO {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "Unit price must be greater than zero".to_string(),
        )));
    }
    check_precision("Quantity", quantity, QUANTITY_DECIMAL_PLACES)?;
    check_precision("Unit price", unit_price, UNIT_PRICE_DECIMAL_PLACES)?;
    validate_date_range("Valuation date", valuation_date)
}

/// Rejects values with more fractional digits than `scale`, or more integer
/// digits than fit next to them within `MAX_DECIMAL_DIGITS`.
fn check_precision(field: &str, value: Decimal, scale: u32) -> Result<()> {
    if value.normalize().scale() > scale {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "{} cannot have more than {} decimal places",
            field, scale
        ))));
    }
    let integer_digits = MAX_DECIMAL_DIGITS - scale;
    let limit = Decimal::from_i128_with_scale(10i128.pow(integer_digits), 0);
    if value.trunc().abs() >= limit {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "{} cannot have more than {} digits before the decimal point",
            field, integer_digits
        ))));
    }
    Ok(())
}
