//! Holdings module - positions held by a portfolio on a valuation date.

mod holdings_model;
mod holdings_service;
mod holdings_traits;

#[cfg(test)]
mod holdings_model_tests;

pub use holdings_model::{AssetType, Holding, HoldingFilter, HoldingUpdate, NewHolding};
pub use holdings_service::HoldingService;
pub use holdings_traits::{HoldingRepositoryTrait, HoldingServiceTrait};
