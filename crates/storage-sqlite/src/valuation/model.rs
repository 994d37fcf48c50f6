//! Database model for valuation snapshots.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use std::str::FromStr;

use crate::utils::{parse_date, parse_decimal};
use valuation_core::valuation::{SnapshotStatus, ValuationSnapshot};
use valuation_core::{Error, Result};

#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::valuation_snapshots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ValuationSnapshotDB {
    pub id: String,
    pub portfolio_id: String,
    pub snapshot_date: String,
    pub status: String,
    pub total_aum: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<ValuationSnapshotDB> for ValuationSnapshot {
    type Error = Error;

    fn try_from(db: ValuationSnapshotDB) -> Result<Self> {
        let total_aum = match db.total_aum.as_deref() {
            Some(raw) => Some(parse_decimal("valuation_snapshots.total_aum", raw)?),
            None => None,
        };
        Ok(Self {
            snapshot_date: parse_date("valuation_snapshots.snapshot_date", &db.snapshot_date)?,
            status: SnapshotStatus::from_str(&db.status)?,
            total_aum,
            id: db.id,
            portfolio_id: db.portfolio_id,
            notes: db.notes,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

pub(crate) fn to_domain(rows: Vec<ValuationSnapshotDB>) -> Result<Vec<ValuationSnapshot>> {
    rows.into_iter().map(ValuationSnapshot::try_from).collect()
}
