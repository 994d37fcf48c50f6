use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::Sqlite;
use diesel::upsert::excluded;
use diesel::SqliteConnection;
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use valuation_core::pagination::{Page, PageRequest};
use valuation_core::valuation::{
    SnapshotFields, SnapshotFilter, SnapshotRepositoryTrait, SnapshotStatus, ValuationSnapshot,
};
use valuation_core::{Error, Result};

use super::model::{to_domain, ValuationSnapshotDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::valuation_snapshots;
use crate::utils::format_date;

pub struct SnapshotRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl SnapshotRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }

    fn filtered(filter: &SnapshotFilter) -> valuation_snapshots::BoxedQuery<'static, Sqlite> {
        let mut query = valuation_snapshots::table.into_boxed();
        if let Some(portfolio_id) = &filter.portfolio_id {
            query = query.filter(valuation_snapshots::portfolio_id.eq(portfolio_id.clone()));
        }
        if let Some(status) = filter.status {
            query = query.filter(valuation_snapshots::status.eq(status.as_str()));
        }
        if let Some(snapshot_date) = filter.snapshot_date {
            query = query.filter(valuation_snapshots::snapshot_date.eq(format_date(snapshot_date)));
        }
        query
    }

    /// Applies `changes` to one snapshot row inside a writer job and returns the
    /// stored result, or `NotFound` when the id is unknown.
    async fn update_one<F>(&self, snapshot_id: &str, changes: F) -> Result<ValuationSnapshot>
    where
        F: FnOnce(&mut SqliteConnection, &str) -> QueryResult<Option<ValuationSnapshotDB>>
            + Send
            + 'static,
    {
        let snapshot_id = snapshot_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<ValuationSnapshot> {
                let row = changes(conn, &snapshot_id)
                    .map_err(StorageError::from)?
                    .ok_or_else(|| Error::not_found("Valuation snapshot", &snapshot_id))?;
                ValuationSnapshot::try_from(row)
            })
            .await
    }
}

#[async_trait]
impl SnapshotRepositoryTrait for SnapshotRepository {
    async fn upsert(
        &self,
        portfolio_id: &str,
        snapshot_date: NaiveDate,
        fields: SnapshotFields,
    ) -> Result<(ValuationSnapshot, bool)> {
        let portfolio_id = portfolio_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<(ValuationSnapshot, bool)> {
                let now = Utc::now().naive_utc();
                let candidate = ValuationSnapshotDB {
                    id: Uuid::new_v4().to_string(),
                    portfolio_id,
                    snapshot_date: format_date(snapshot_date),
                    status: fields.status.as_str().to_string(),
                    total_aum: fields.total_aum.map(|aum| aum.to_string()),
                    notes: fields.notes,
                    created_at: now,
                    updated_at: now,
                };

                // One statement keyed on (portfolio_id, snapshot_date); the row
                // keeps its id and created_at when it already exists.
                let stored = diesel::insert_into(valuation_snapshots::table)
                    .values(&candidate)
                    .on_conflict((
                        valuation_snapshots::portfolio_id,
                        valuation_snapshots::snapshot_date,
                    ))
                    .do_update()
                    .set((
                        valuation_snapshots::status.eq(excluded(valuation_snapshots::status)),
                        valuation_snapshots::total_aum.eq(excluded(valuation_snapshots::total_aum)),
                        valuation_snapshots::notes.eq(excluded(valuation_snapshots::notes)),
                        valuation_snapshots::updated_at
                            .eq(excluded(valuation_snapshots::updated_at)),
                    ))
                    .returning(ValuationSnapshotDB::as_returning())
                    .get_result::<ValuationSnapshotDB>(conn)
                    .map_err(StorageError::from)?;

                let was_created = stored.id == candidate.id;
                debug!(
                    "Upserted snapshot {} for portfolio {} on {} (created: {})",
                    stored.id, stored.portfolio_id, stored.snapshot_date, was_created
                );
                Ok((ValuationSnapshot::try_from(stored)?, was_created))
            })
            .await
    }

    fn get_by_id(&self, snapshot_id: &str) -> Result<ValuationSnapshot> {
        let mut conn = get_connection(&self.pool)?;
        let row = valuation_snapshots::table
            .find(snapshot_id)
            .select(ValuationSnapshotDB::as_select())
            .first::<ValuationSnapshotDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .ok_or_else(|| Error::not_found("Valuation snapshot", snapshot_id))?;
        ValuationSnapshot::try_from(row)
    }

    async fn update_total_aum(
        &self,
        snapshot_id: &str,
        total_aum: Decimal,
    ) -> Result<ValuationSnapshot> {
        self.update_one(snapshot_id, move |conn, id| {
            diesel::update(valuation_snapshots::table.find(id))
                .set((
                    valuation_snapshots::total_aum.eq(Some(total_aum.to_string())),
                    valuation_snapshots::updated_at.eq(Utc::now().naive_utc()),
                ))
                .returning(ValuationSnapshotDB::as_returning())
                .get_result::<ValuationSnapshotDB>(conn)
                .optional()
        })
        .await
    }

    async fn update_status(
        &self,
        snapshot_id: &str,
        status: SnapshotStatus,
    ) -> Result<ValuationSnapshot> {
        self.update_one(snapshot_id, move |conn, id| {
            diesel::update(valuation_snapshots::table.find(id))
                .set((
                    valuation_snapshots::status.eq(status.as_str()),
                    valuation_snapshots::updated_at.eq(Utc::now().naive_utc()),
                ))
                .returning(ValuationSnapshotDB::as_returning())
                .get_result::<ValuationSnapshotDB>(conn)
                .optional()
        })
        .await
    }

    async fn update_details(
        &self,
        snapshot_id: &str,
        status: SnapshotStatus,
        notes: Option<String>,
    ) -> Result<ValuationSnapshot> {
        self.update_one(snapshot_id, move |conn, id| {
            diesel::update(valuation_snapshots::table.find(id))
                .set((
                    valuation_snapshots::status.eq(status.as_str()),
                    valuation_snapshots::notes.eq(notes),
                    valuation_snapshots::updated_at.eq(Utc::now().naive_utc()),
                ))
                .returning(ValuationSnapshotDB::as_returning())
                .get_result::<ValuationSnapshotDB>(conn)
                .optional()
        })
        .await
    }

    async fn delete(&self, snapshot_id: &str) -> Result<usize> {
        let snapshot_id = snapshot_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(valuation_snapshots::table.find(snapshot_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<ValuationSnapshot>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = valuation_snapshots::table
            .filter(valuation_snapshots::portfolio_id.eq(portfolio_id))
            .order((
                valuation_snapshots::snapshot_date.desc(),
                valuation_snapshots::created_at.desc(),
            ))
            .select(ValuationSnapshotDB::as_select())
            .load::<ValuationSnapshotDB>(&mut conn)
            .map_err(StorageError::from)?;
        to_domain(rows)
    }

    fn count_by_portfolio(&self, portfolio_id: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        let count = valuation_snapshots::table
            .filter(valuation_snapshots::portfolio_id.eq(portfolio_id))
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(count)
    }

    fn get_latest_for_portfolio(&self, portfolio_id: &str) -> Result<Option<ValuationSnapshot>> {
        let mut conn = get_connection(&self.pool)?;
        valuation_snapshots::table
            .filter(valuation_snapshots::portfolio_id.eq(portfolio_id))
            .order((
                valuation_snapshots::snapshot_date.desc(),
                valuation_snapshots::created_at.desc(),
            ))
            .select(ValuationSnapshotDB::as_select())
            .first::<ValuationSnapshotDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .map(ValuationSnapshot::try_from)
            .transpose()
    }

    fn search(
        &self,
        filter: &SnapshotFilter,
        page: PageRequest,
    ) -> Result<Page<ValuationSnapshot>> {
        let mut conn = get_connection(&self.pool)?;

        let total_row_count = Self::filtered(filter)
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;
        let window = page.window(total_row_count);

        let rows = Self::filtered(filter)
            .order((
                valuation_snapshots::snapshot_date.desc(),
                valuation_snapshots::created_at.desc(),
            ))
            .limit(window.limit)
            .offset(window.offset)
            .select(ValuationSnapshotDB::as_select())
            .load::<ValuationSnapshotDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(Page::new(to_domain(rows)?, total_row_count, window))
    }
}
