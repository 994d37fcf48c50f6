//! Holding repository and service traits.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::holdings_model::{Holding, HoldingFilter, HoldingUpdate, NewHolding};
use crate::errors::Result;
use crate::pagination::{Page, PageRequest};

/// Durable store of holdings.
#[async_trait]
pub trait HoldingRepositoryTrait: Send + Sync {
    async fn create(&self, new_holding: NewHolding) -> Result<Holding>;

    async fn update(&self, holding: Holding) -> Result<Holding>;

    /// Returns the number of deleted records.
    async fn delete(&self, holding_id: &str) -> Result<usize>;

    fn get_by_id(&self, holding_id: &str) -> Result<Holding>;

    /// Holdings of a portfolio whose valuation date is exactly `valuation_date`.
    fn find_by_portfolio_and_date(
        &self,
        portfolio_id: &str,
        valuation_date: NaiveDate,
    ) -> Result<Vec<Holding>>;

    /// All holdings of a portfolio, newest valuation date first.
    fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Holding>>;

    fn count_by_portfolio(&self, portfolio_id: &str) -> Result<i64>;

    /// Filtered, paged listing ordered by valuation date (desc) then asset name.
    fn search(&self, filter: &HoldingFilter, page: PageRequest) -> Result<Page<Holding>>;
}

#[async_trait]
pub trait HoldingServiceTrait: Send + Sync {
    async fn create_holding(&self, new_holding: NewHolding) -> Result<Holding>;

    async fn update_holding(&self, holding_update: HoldingUpdate) -> Result<Holding>;

    async fn delete_holding(&self, holding_id: &str) -> Result<()>;

    fn get_holding(&self, holding_id: &str) -> Result<Holding>;

    fn search_holdings(&self, filter: HoldingFilter, page: PageRequest) -> Result<Page<Holding>>;
}
