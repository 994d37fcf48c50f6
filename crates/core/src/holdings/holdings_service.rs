use log::debug;
use std::sync::Arc;

use super::holdings_model::{Holding, HoldingFilter, HoldingUpdate, NewHolding};
use super::holdings_traits::{HoldingRepositoryTrait, HoldingServiceTrait};
use crate::errors::{Error, Result};
use crate::pagination::{Page, PageRequest};
use crate::portfolios::PortfolioRepositoryTrait;

pub struct HoldingService {
    repository: Arc<dyn HoldingRepositoryTrait>,
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
}

impl HoldingService {
    pub fn new(
        repository: Arc<dyn HoldingRepositoryTrait>,
        portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            portfolio_repository,
        }
    }

    fn ensure_portfolio_exists(&self, portfolio_id: &str) -> Result<()> {
        if self.portfolio_repository.exists(portfolio_id)? {
            Ok(())
        } else {
            Err(Error::not_found("Portfolio", portfolio_id))
        }
    }
}

#[async_trait::async_trait]
impl HoldingServiceTrait for HoldingService {
    async fn create_holding(&self, new_holding: NewHolding) -> Result<Holding> {
        new_holding.validate()?;
        self.ensure_portfolio_exists(&new_holding.portfolio_id)?;
        debug!(
            "Creating holding '{}' for portfolio {} on {}",
            new_holding.asset_name, new_holding.portfolio_id, new_holding.valuation_date
        );
        self.repository.create(new_holding).await
    }

    async fn update_holding(&self, holding_update: HoldingUpdate) -> Result<Holding> {
        let mut holding = self.repository.get_by_id(&holding_update.id)?;
        let moves_portfolio = holding_update
            .portfolio_id
            .as_ref()
            .is_some_and(|portfolio_id| *portfolio_id != holding.portfolio_id);
        holding_update.apply_to(&mut holding)?;
        if moves_portfolio {
            self.ensure_portfolio_exists(&holding.portfolio_id)?;
        }
        self.repository.update(holding).await
    }

    async fn delete_holding(&self, holding_id: &str) -> Result<()> {
        if self.repository.delete(holding_id).await? == 0 {
            return Err(Error::not_found("Holding", holding_id));
        }
        Ok(())
    }

    fn get_holding(&self, holding_id: &str) -> Result<Holding> {
        self.repository.get_by_id(holding_id)
    }

    fn search_holdings(&self, filter: HoldingFilter, page: PageRequest) -> Result<Page<Holding>> {
        self.repository.search(&filter, page)
    }
}
