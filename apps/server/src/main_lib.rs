use std::sync::Arc;

use crate::config::Config;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use valuation_core::{
    holdings::{HoldingService, HoldingServiceTrait},
    portfolios::{PortfolioService, PortfolioServiceTrait},
    statistics::{StatisticsService, StatisticsServiceTrait},
    valuation::{ValuationService, ValuationServiceTrait},
};
use valuation_storage_sqlite::{
    db, holdings::HoldingRepository, portfolios::PortfolioRepository,
    valuation::SnapshotRepository,
};

pub struct AppState {
    pub portfolio_service: Arc<dyn PortfolioServiceTrait + Send + Sync>,
    pub holding_service: Arc<dyn HoldingServiceTrait + Send + Sync>,
    pub valuation_service: Arc<dyn ValuationServiceTrait + Send + Sync>,
    pub statistics_service: Arc<dyn StatisticsServiceTrait + Send + Sync>,
}

pub fn init_tracing() {
    let log_format = std::env::var("VF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let portfolio_repository = Arc::new(PortfolioRepository::new(pool.clone(), writer.clone()));
    let holding_repository = Arc::new(HoldingRepository::new(pool.clone(), writer.clone()));
    let snapshot_repository = Arc::new(SnapshotRepository::new(pool.clone(), writer.clone()));

    let portfolio_service = Arc::new(PortfolioService::new(
        portfolio_repository.clone(),
        holding_repository.clone(),
        snapshot_repository.clone(),
    ));
    let holding_service = Arc::new(HoldingService::new(
        holding_repository.clone(),
        portfolio_repository.clone(),
    ));
    let valuation_service = Arc::new(ValuationService::new(
        portfolio_repository.clone(),
        holding_repository.clone(),
        snapshot_repository.clone(),
    ));
    let statistics_service = Arc::new(StatisticsService::new(
        portfolio_repository,
        holding_repository,
        snapshot_repository,
    ));

    Ok(Arc::new(AppState {
        portfolio_service,
        holding_service,
        valuation_service,
        statistics_service,
    }))
}
