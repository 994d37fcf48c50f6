//! Read-only rollups over a portfolio's holdings and snapshots.

mod statistics_model;
mod statistics_service;


pub use statistics_model::PortfolioStatistics;
pub use statistics_service::{StatisticsService, StatisticsServiceTrait};
