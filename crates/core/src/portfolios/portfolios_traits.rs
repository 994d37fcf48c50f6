//! Portfolio repository and service traits.
//!
//! These traits define the contract for portfolio operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;

use super::portfolios_model::{NewPortfolio, Portfolio, PortfolioDetail, PortfolioUpdate};
use crate::errors::Result;
use crate::pagination::{Page, PageRequest};

/// Trait defining the contract for Portfolio repository operations.
#[async_trait]
pub trait PortfolioRepositoryTrait: Send + Sync {
    /// Creates a new portfolio.
    async fn create(&self, new_portfolio: NewPortfolio) -> Result<Portfolio>;

    /// Persists the descriptive fields of an existing portfolio.
    async fn update(&self, portfolio: Portfolio) -> Result<Portfolio>;

    /// Deletes a portfolio by its ID. Holdings and snapshots go with it.
    ///
    /// Returns the number of deleted records.
    async fn delete(&self, portfolio_id: &str) -> Result<usize>;

    /// Retrieves a portfolio by its ID.
    fn get_by_id(&self, portfolio_id: &str) -> Result<Portfolio>;

    fn exists(&self, portfolio_id: &str) -> Result<bool>;

    /// Case-insensitive substring search over name, client name and client email,
    /// newest first.
    fn search(&self, query: Option<&str>, page: PageRequest) -> Result<Page<Portfolio>>;
}

/// Trait defining the contract for Portfolio service operations.
#[async_trait]
pub trait PortfolioServiceTrait: Send + Sync {
    async fn create_portfolio(&self, new_portfolio: NewPortfolio) -> Result<Portfolio>;

    async fn update_portfolio(&self, portfolio_update: PortfolioUpdate) -> Result<Portfolio>;

    async fn delete_portfolio(&self, portfolio_id: &str) -> Result<()>;

    fn get_portfolio(&self, portfolio_id: &str) -> Result<Portfolio>;

    /// Loads the portfolio with its holdings and valuation history.
    fn get_portfolio_detail(&self, portfolio_id: &str) -> Result<PortfolioDetail>;

    fn search_portfolios(&self, query: Option<&str>, page: PageRequest)
        -> Result<Page<Portfolio>>;
}
