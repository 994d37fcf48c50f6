//! SQLite storage implementation for valuation snapshots.

mod model;
mod repository;

pub use model::ValuationSnapshotDB;
pub use repository::SnapshotRepository;
