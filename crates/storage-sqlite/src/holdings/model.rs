//! Database model for holdings.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use std::str::FromStr;

use crate::utils::{format_date, parse_date, parse_decimal};
use valuation_core::holdings::{AssetType, Holding};
use valuation_core::{Error, Result};

/// Quantity and unit price are kept as decimal text to stay exact.
#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::holdings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HoldingDB {
    pub id: String,
    pub portfolio_id: String,
    pub asset_name: String,
    pub asset_type: String,
    pub quantity: String,
    pub unit_price: String,
    pub valuation_date: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<HoldingDB> for Holding {
    type Error = Error;

    fn try_from(db: HoldingDB) -> Result<Self> {
        Ok(Self {
            asset_type: AssetType::from_str(&db.asset_type)?,
            quantity: parse_decimal("holdings.quantity", &db.quantity)?,
            unit_price: parse_decimal("holdings.unit_price", &db.unit_price)?,
            valuation_date: parse_date("holdings.valuation_date", &db.valuation_date)?,
            id: db.id,
            portfolio_id: db.portfolio_id,
            asset_name: db.asset_name,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<Holding> for HoldingDB {
    fn from(domain: Holding) -> Self {
        Self {
            id: domain.id,
            portfolio_id: domain.portfolio_id,
            asset_name: domain.asset_name,
            asset_type: domain.asset_type.as_str().to_string(),
            quantity: domain.quantity.to_string(),
            unit_price: domain.unit_price.to_string(),
            valuation_date: format_date(domain.valuation_date),
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}

pub(crate) fn to_domain(rows: Vec<HoldingDB>) -> Result<Vec<Holding>> {
    rows.into_iter().map(Holding::try_from).collect()
}
