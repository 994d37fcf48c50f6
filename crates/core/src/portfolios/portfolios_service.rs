use log::debug;
use std::sync::Arc;

use super::portfolios_model::{NewPortfolio, Portfolio, PortfolioDetail, PortfolioUpdate};
use super::portfolios_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
use crate::errors::{Error, Result};
use crate::holdings::HoldingRepositoryTrait;
use crate::pagination::{Page, PageRequest};
use crate::valuation::SnapshotRepositoryTrait;

/// Service for managing portfolios
pub struct PortfolioService {
    repository: Arc<dyn PortfolioRepositoryTrait>,
    holding_repository: Arc<dyn HoldingRepositoryTrait>,
    snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
}

impl PortfolioService {
    pub fn new(
        repository: Arc<dyn PortfolioRepositoryTrait>,
        holding_repository: Arc<dyn HoldingRepositoryTrait>,
        snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            holding_repository,
            snapshot_repository,
        }
    }
}

#[async_trait::async_trait]
impl PortfolioServiceTrait for PortfolioService {
    async fn create_portfolio(&self, mut new_portfolio: NewPortfolio) -> Result<Portfolio> {
        new_portfolio.validate()?;
        new_portfolio.description = new_portfolio
            .description
            .filter(|description| !description.trim().is_empty());
        debug!("Creating portfolio '{}'", new_portfolio.name);
        self.repository.create(new_portfolio).await
    }

    async fn update_portfolio(&self, portfolio_update: PortfolioUpdate) -> Result<Portfolio> {
        let mut portfolio = self.repository.get_by_id(&portfolio_update.id)?;
        portfolio_update.apply_to(&mut portfolio)?;
        self.repository.update(portfolio).await
    }

    async fn delete_portfolio(&self, portfolio_id: &str) -> Result<()> {
        let deleted = self.repository.delete(portfolio_id).await?;
        if deleted == 0 {
            return Err(Error::not_found("Portfolio", portfolio_id));
        }
        debug!("Deleted portfolio {}", portfolio_id);
        Ok(())
    }

    fn get_portfolio(&self, portfolio_id: &str) -> Result<Portfolio> {
        self.repository.get_by_id(portfolio_id)
    }

    fn get_portfolio_detail(&self, portfolio_id: &str) -> Result<PortfolioDetail> {
        let portfolio = self.repository.get_by_id(portfolio_id)?;
        let holdings = self.holding_repository.list_by_portfolio(portfolio_id)?;
        let valuation_snapshots = self.snapshot_repository.list_by_portfolio(portfolio_id)?;
        Ok(PortfolioDetail {
            portfolio,
            holdings,
            valuation_snapshots,
        })
    }

    fn search_portfolios(
        &self,
        query: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Portfolio>> {
        let query = query.map(str::trim).filter(|q| !q.is_empty());
        self.repository.search(query, page)
    }
}
