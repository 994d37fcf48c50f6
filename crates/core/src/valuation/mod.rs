//! Valuation engine: AUM aggregation, snapshot upsert and the snapshot status lifecycle.

pub(crate) mod valuation_calculator;
mod valuation_model;
mod valuation_service;
mod valuation_traits;


pub use valuation_calculator::calculate_aum;
pub use valuation_model::{
    NewValuationSnapshot, SnapshotFields, SnapshotFilter, SnapshotStatus, SnapshotUpdate,
    TransitionPolicy, ValuationSnapshot,
};
pub use valuation_service::ValuationService;
pub use valuation_traits::{SnapshotRepositoryTrait, ValuationServiceTrait};
