use log::debug;
use std::sync::Arc;

use super::statistics_model::PortfolioStatistics;
use crate::errors::{Error, Result};
use crate::holdings::HoldingRepositoryTrait;
use crate::portfolios::PortfolioRepositoryTrait;
use crate::valuation::SnapshotRepositoryTrait;

pub trait StatisticsServiceTrait: Send + Sync {
    /// Fails with `NotFound` for an unknown portfolio.
    fn get_portfolio_statistics(&self, portfolio_id: &str) -> Result<PortfolioStatistics>;
}

pub struct StatisticsService {
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    holding_repository: Arc<dyn HoldingRepositoryTrait>,
    snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
}

impl StatisticsService {
    pub fn new(
        portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
        holding_repository: Arc<dyn HoldingRepositoryTrait>,
        snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
    ) -> Self {
        Self {
            portfolio_repository,
            holding_repository,
            snapshot_repository,
        }
    }
}

impl StatisticsServiceTrait for StatisticsService {
    fn get_portfolio_statistics(&self, portfolio_id: &str) -> Result<PortfolioStatistics> {
        if !self.portfolio_repository.exists(portfolio_id)? {
            return Err(Error::not_found("Portfolio", portfolio_id));
        }

        let total_holdings = self.holding_repository.count_by_portfolio(portfolio_id)?;
        let total_snapshots = self.snapshot_repository.count_by_portfolio(portfolio_id)?;
        let latest = self
            .snapshot_repository
            .get_latest_for_portfolio(portfolio_id)?;

        debug!(
            "Statistics for portfolio {}: {} holdings, {} snapshots",
            portfolio_id, total_holdings, total_snapshots
        );

        Ok(PortfolioStatistics {
            portfolio_id: portfolio_id.to_string(),
            total_holdings,
            total_snapshots,
            latest_snapshot_date: latest.as_ref().map(|s| s.snapshot_date),
            latest_aum: latest.and_then(|s| s.total_aum),
        })
    }
}
