use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::Sqlite;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use valuation_core::holdings::{Holding, HoldingFilter, HoldingRepositoryTrait, NewHolding};
use valuation_core::pagination::{Page, PageRequest};
use valuation_core::{Error, Result};

use super::model::{to_domain, HoldingDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::holdings;
use crate::utils::format_date;

pub struct HoldingRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl HoldingRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }

    fn filtered(filter: &HoldingFilter) -> holdings::BoxedQuery<'static, Sqlite> {
        let mut query = holdings::table.into_boxed();
        if let Some(portfolio_id) = &filter.portfolio_id {
            query = query.filter(holdings::portfolio_id.eq(portfolio_id.clone()));
        }
        if let Some(valuation_date) = filter.valuation_date {
            query = query.filter(holdings::valuation_date.eq(format_date(valuation_date)));
        }
        query
    }
}

#[async_trait]
impl HoldingRepositoryTrait for HoldingRepository {
    async fn create(&self, new_holding: NewHolding) -> Result<Holding> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Holding> {
                let now = Utc::now().naive_utc();
                let row = HoldingDB::from(Holding {
                    id: new_holding
                        .id
                        .unwrap_or_else(|| Uuid::new_v4().to_string()),
                    portfolio_id: new_holding.portfolio_id,
                    asset_name: new_holding.asset_name,
                    asset_type: new_holding.asset_type,
                    quantity: new_holding.quantity,
                    unit_price: new_holding.unit_price,
                    valuation_date: new_holding.valuation_date,
                    created_at: now,
                    updated_at: now,
                });

                let result_db = diesel::insert_into(holdings::table)
                    .values(&row)
                    .returning(HoldingDB::as_returning())
                    .get_result::<HoldingDB>(conn)
                    .map_err(StorageError::from)?;
                Holding::try_from(result_db)
            })
            .await
    }

    async fn update(&self, holding: Holding) -> Result<Holding> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Holding> {
                let row = HoldingDB::from(holding);
                let result_db = diesel::update(holdings::table.find(&row.id))
                    .set((
                        holdings::portfolio_id.eq(&row.portfolio_id),
                        holdings::asset_name.eq(&row.asset_name),
                        holdings::asset_type.eq(&row.asset_type),
                        holdings::quantity.eq(&row.quantity),
                        holdings::unit_price.eq(&row.unit_price),
                        holdings::valuation_date.eq(&row.valuation_date),
                        holdings::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .returning(HoldingDB::as_returning())
                    .get_result::<HoldingDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .ok_or_else(|| Error::not_found("Holding", &row.id))?;
                Holding::try_from(result_db)
            })
            .await
    }

    async fn delete(&self, holding_id: &str) -> Result<usize> {
        let holding_id = holding_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(holdings::table.find(holding_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    fn get_by_id(&self, holding_id: &str) -> Result<Holding> {
        let mut conn = get_connection(&self.pool)?;
        let row = holdings::table
            .find(holding_id)
            .select(HoldingDB::as_select())
            .first::<HoldingDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .ok_or_else(|| Error::not_found("Holding", holding_id))?;
        Holding::try_from(row)
    }

    fn find_by_portfolio_and_date(
        &self,
        portfolio_id: &str,
        valuation_date: NaiveDate,
    ) -> Result<Vec<Holding>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = holdings::table
            .filter(holdings::portfolio_id.eq(portfolio_id))
            .filter(holdings::valuation_date.eq(format_date(valuation_date)))
            .order(holdings::asset_name.asc())
            .select(HoldingDB::as_select())
            .load::<HoldingDB>(&mut conn)
            .into_core()?;
        to_domain(rows)
    }

    fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Holding>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = holdings::table
            .filter(holdings::portfolio_id.eq(portfolio_id))
            .order((holdings::valuation_date.desc(), holdings::asset_name.asc()))
            .select(HoldingDB::as_select())
            .load::<HoldingDB>(&mut conn)
            .into_core()?;
        to_domain(rows)
    }

    fn count_by_portfolio(&self, portfolio_id: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        let count = holdings::table
            .filter(holdings::portfolio_id.eq(portfolio_id))
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()?;
        Ok(count)
    }

    fn search(&self, filter: &HoldingFilter, page: PageRequest) -> Result<Page<Holding>> {
        let mut conn = get_connection(&self.pool)?;

        let total_row_count = Self::filtered(filter)
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;
        let window = page.window(total_row_count);

        let rows = Self::filtered(filter)
            .order((holdings::valuation_date.desc(), holdings::asset_name.asc()))
            .limit(window.limit)
            .offset(window.offset)
            .select(HoldingDB::as_select())
            .load::<HoldingDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(Page::new(to_domain(rows)?, total_row_count, window))
    }
}
