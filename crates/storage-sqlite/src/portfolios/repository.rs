use async_trait::async_trait;
use chrono::Utc;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;
use uuid::Uuid;

use valuation_core::pagination::{Page, PageRequest};
use valuation_core::portfolios::{NewPortfolio, Portfolio, PortfolioRepositoryTrait};
use valuation_core::{Error, Result};

use super::model::PortfolioDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::portfolios;
use crate::utils::{like_pattern, LIKE_ESCAPE};

pub struct PortfolioRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl PortfolioRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }

    fn search_query(query: Option<&str>) -> portfolios::BoxedQuery<'static, diesel::sqlite::Sqlite> {
        let mut boxed = portfolios::table.into_boxed();
        if let Some(term) = query {
            // SQLite LIKE is case-insensitive for ASCII.
            let pattern = like_pattern(term);
            boxed = boxed.filter(
                portfolios::name
                    .like(pattern.clone())
                    .escape(LIKE_ESCAPE)
                    .or(portfolios::client_name
                        .like(pattern.clone())
                        .escape(LIKE_ESCAPE))
                    .or(portfolios::client_email.like(pattern).escape(LIKE_ESCAPE)),
            );
        }
        boxed
    }
}

#[async_trait]
impl PortfolioRepositoryTrait for PortfolioRepository {
    async fn create(&self, new_portfolio: NewPortfolio) -> Result<Portfolio> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Portfolio> {
                let now = Utc::now().naive_utc();
                let row = PortfolioDB {
                    id: new_portfolio
                        .id
                        .unwrap_or_else(|| Uuid::new_v4().to_string()),
                    name: new_portfolio.name,
                    client_name: new_portfolio.client_name,
                    client_email: new_portfolio.client_email,
                    description: new_portfolio.description,
                    created_at: now,
                    updated_at: now,
                };

                let result_db = diesel::insert_into(portfolios::table)
                    .values(&row)
                    .returning(PortfolioDB::as_returning())
                    .get_result::<PortfolioDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Portfolio::from(result_db))
            })
            .await
    }

    async fn update(&self, portfolio: Portfolio) -> Result<Portfolio> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Portfolio> {
                let portfolio_id = portfolio.id.clone();
                let result_db = diesel::update(portfolios::table.find(&portfolio_id))
                    .set((
                        portfolios::name.eq(portfolio.name),
                        portfolios::client_name.eq(portfolio.client_name),
                        portfolios::client_email.eq(portfolio.client_email),
                        portfolios::description.eq(portfolio.description),
                        portfolios::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .returning(PortfolioDB::as_returning())
                    .get_result::<PortfolioDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .ok_or_else(|| Error::not_found("Portfolio", &portfolio_id))?;
                Ok(Portfolio::from(result_db))
            })
            .await
    }

    async fn delete(&self, portfolio_id: &str) -> Result<usize> {
        let portfolio_id = portfolio_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let deleted = diesel::delete(portfolios::table.find(&portfolio_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                debug!(
                    "Deleted {} portfolio row(s) for {}, holdings and snapshots cascade",
                    deleted, portfolio_id
                );
                Ok(deleted)
            })
            .await
    }

    fn get_by_id(&self, portfolio_id: &str) -> Result<Portfolio> {
        let mut conn = get_connection(&self.pool)?;
        portfolios::table
            .find(portfolio_id)
            .select(PortfolioDB::as_select())
            .first::<PortfolioDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .map(Portfolio::from)
            .ok_or_else(|| Error::not_found("Portfolio", portfolio_id))
    }

    fn exists(&self, portfolio_id: &str) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        let found = diesel::select(exists(portfolios::table.find(portfolio_id)))
            .get_result::<bool>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(found)
    }

    fn search(&self, query: Option<&str>, page: PageRequest) -> Result<Page<Portfolio>> {
        let mut conn = get_connection(&self.pool)?;

        let total_row_count = Self::search_query(query)
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;
        let window = page.window(total_row_count);

        let rows = Self::search_query(query)
            .order((portfolios::created_at.desc(), portfolios::id.asc()))
            .limit(window.limit)
            .offset(window.offset)
            .select(PortfolioDB::as_select())
            .load::<PortfolioDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(Page::new(
            rows.into_iter().map(Portfolio::from).collect(),
            total_row_count,
            window,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_db, date};
    use rust_decimal_macros::dec;
    use valuation_core::holdings::HoldingRepositoryTrait;
    use valuation_core::valuation::{SnapshotFields, SnapshotRepositoryTrait, SnapshotStatus};

    #[tokio::test]
    async fn test_create_and_get_portfolio() {
        let db = create_test_db();
        let created = db.add_portfolio("Alpha Growth").await;

        let repo = db.portfolios();
        let fetched = repo.get_by_id(&created.id).unwrap();
        assert_eq!(fetched, created);
        assert!(repo.exists(&created.id).unwrap());
        assert!(!repo.exists("missing").unwrap());
    }

    #[tokio::test]
    async fn test_get_unknown_portfolio_is_not_found() {
        let db = create_test_db();
        let err = db.portfolios().get_by_id("missing").unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_unknown_portfolio_is_not_found() {
        let db = create_test_db();
        let mut portfolio = db.add_portfolio("Alpha").await;
        portfolio.id = "missing".to_string();
        let err = db.portfolios().update(portfolio).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_overwrites_fields() {
        let db = create_test_db();
        let mut portfolio = db.add_portfolio("Alpha").await;
        portfolio.name = "Alpha Renamed".to_string();
        portfolio.description = Some("Long only".to_string());

        let updated = db.portfolios().update(portfolio.clone()).await.unwrap();
        assert_eq!(updated.name, "Alpha Renamed");
        assert_eq!(updated.description.as_deref(), Some("Long only"));
        assert_eq!(updated.created_at, portfolio.created_at);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_holdings_and_snapshots() {
        let db = create_test_db();
        let portfolio = db.add_portfolio("Alpha").await;
        let day = date(2024, 3, 31);
        db.add_holding(&portfolio.id, "ACME", dec!(10), dec!(2.5), day)
            .await;
        let (snapshot, _) = db
            .snapshots()
            .upsert(
                &portfolio.id,
                day,
                SnapshotFields {
                    status: SnapshotStatus::Draft,
                    total_aum: Some(dec!(25.00)),
                    notes: None,
                },
            )
            .await
            .unwrap();

        let deleted = db.portfolios().delete(&portfolio.id).await.unwrap();
        assert_eq!(deleted, 1);

        assert_eq!(db.holdings().count_by_portfolio(&portfolio.id).unwrap(), 0);
        assert!(db
            .snapshots()
            .get_by_id(&snapshot.id)
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_delete_unknown_portfolio_removes_nothing() {
        let db = create_test_db();
        assert_eq!(db.portfolios().delete("missing").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_matches_any_field_case_insensitively() {
        let db = create_test_db();
        db.add_portfolio("Alpha Growth").await;
        db.add_portfolio("Beta Income").await;
        db.add_portfolio("Gamma").await;

        let repo = db.portfolios();
        let by_name = repo.search(Some("growth"), PageRequest::default()).unwrap();
        assert_eq!(by_name.meta.total_row_count, 1);
        assert_eq!(by_name.data[0].name, "Alpha Growth");

        let by_client = repo.search(Some("BETA INCOME CLIENT"), PageRequest::default()).unwrap();
        assert_eq!(by_client.data.len(), 1);

        let by_email = repo.search(Some("gamma@example"), PageRequest::default()).unwrap();
        assert_eq!(by_email.data.len(), 1);

        let all = repo.search(None, PageRequest::default()).unwrap();
        assert_eq!(all.meta.total_row_count, 3);
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let db = create_test_db();
        db.add_portfolio("Alpha").await;

        let page = db
            .portfolios()
            .search(Some("%"), PageRequest::default())
            .unwrap();
        assert_eq!(page.meta.total_row_count, 0);
        assert!(page.data.is_empty());
    }

    #[tokio::test]
    async fn test_search_clamps_page_past_the_end() {
        let db = create_test_db();
        for i in 0..5 {
            db.add_portfolio(&format!("Portfolio {}", i)).await;
        }

        let page = db
            .portfolios()
            .search(None, PageRequest { page: 9, page_size: 2 })
            .unwrap();
        assert_eq!(page.meta.total_row_count, 5);
        assert_eq!(page.meta.last_page, 3);
        assert_eq!(page.meta.current_page, 3);
        assert_eq!(page.data.len(), 1);
    }
}
