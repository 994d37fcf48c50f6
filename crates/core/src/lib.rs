//! Valuation Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic of the portfolio valuation service:
//! holdings, AUM aggregation, valuation snapshots and their lifecycle, and
//! portfolio statistics. It is database-agnostic and defines traits that are
//! implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod holdings;
pub mod pagination;
pub mod portfolios;
pub mod statistics;
pub mod utils;
pub mod valuation;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
