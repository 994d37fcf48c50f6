//! Temp-file databases for repository tests.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tempfile::{tempdir, TempDir};

use valuation_core::holdings::{AssetType, Holding, HoldingRepositoryTrait, NewHolding};
use valuation_core::portfolios::{NewPortfolio, Portfolio, PortfolioRepositoryTrait};

use crate::db::{create_pool, run_migrations, spawn_writer, DbPool, WriteHandle};
use crate::holdings::HoldingRepository;
use crate::portfolios::PortfolioRepository;
use crate::valuation::SnapshotRepository;

pub(crate) struct TestDb {
    pub pool: Arc<DbPool>,
    pub writer: WriteHandle,
    // Keeps the database file alive for the duration of the test.
    _dir: TempDir,
}

impl TestDb {
    pub fn portfolios(&self) -> PortfolioRepository {
        PortfolioRepository::new(Arc::clone(&self.pool), self.writer.clone())
    }

    pub fn holdings(&self) -> HoldingRepository {
        HoldingRepository::new(Arc::clone(&self.pool), self.writer.clone())
    }

    pub fn snapshots(&self) -> SnapshotRepository {
        SnapshotRepository::new(Arc::clone(&self.pool), self.writer.clone())
    }

    pub async fn add_portfolio(&self, name: &str) -> Portfolio {
        self.portfolios()
            .create(NewPortfolio {
                id: None,
                name: name.to_string(),
                client_name: format!("{} Client", name),
                client_email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                description: None,
            })
            .await
            .expect("Failed to create portfolio")
    }

    pub async fn add_holding(
        &self,
        portfolio_id: &str,
        asset_name: &str,
        quantity: Decimal,
        unit_price: Decimal,
        valuation_date: NaiveDate,
    ) -> Holding {
        self.holdings()
            .create(NewHolding {
                id: None,
                portfolio_id: portfolio_id.to_string(),
                asset_name: asset_name.to_string(),
                asset_type: AssetType::Stock,
                quantity,
                unit_price,
                valuation_date,
            })
            .await
            .expect("Failed to create holding")
    }
}

pub(crate) fn create_test_db() -> TestDb {
    let dir = tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("test.db").to_string_lossy().to_string();

    let pool = create_pool(&db_path).expect("Failed to create pool");
    run_migrations(&pool).expect("Failed to run migrations");
    let writer = spawn_writer((*pool).clone());

    TestDb {
        pool,
        writer,
        _dir: dir,
    }
}

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
