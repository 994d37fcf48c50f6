use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::valuation_model::{
    NewValuationSnapshot, SnapshotFields, SnapshotFilter, SnapshotStatus, SnapshotUpdate,
    ValuationSnapshot,
};
use crate::errors::Result;
use crate::holdings::Holding;
use crate::pagination::{Page, PageRequest};

/// Durable keyed storage for valuation snapshots.
#[async_trait]
pub trait SnapshotRepositoryTrait: Send + Sync {
    /// Inserts the snapshot for `(portfolio_id, snapshot_date)` or overwrites the
    /// status, AUM and notes of the existing one.
    ///
    /// Must be atomic on the key: concurrent calls for the same key never leave
    /// two rows. Returns the stored snapshot and whether it was newly created.
    async fn upsert(
        &self,
        portfolio_id: &str,
        snapshot_date: NaiveDate,
        fields: SnapshotFields,
    ) -> Result<(ValuationSnapshot, bool)>;

    /// Fails with `NotFound` when no snapshot has this id.
    fn get_by_id(&self, snapshot_id: &str) -> Result<ValuationSnapshot>;

    /// Overwrites only the AUM.
    async fn update_total_aum(
        &self,
        snapshot_id: &str,
        total_aum: Decimal,
    ) -> Result<ValuationSnapshot>;

    /// Overwrites only the status.
    async fn update_status(
        &self,
        snapshot_id: &str,
        status: SnapshotStatus,
    ) -> Result<ValuationSnapshot>;

    /// Overwrites status and notes, leaving the AUM alone.
    async fn update_details(
        &self,
        snapshot_id: &str,
        status: SnapshotStatus,
        notes: Option<String>,
    ) -> Result<ValuationSnapshot>;

    /// Returns the number of deleted records.
    async fn delete(&self, snapshot_id: &str) -> Result<usize>;

    /// Snapshots of a portfolio, newest snapshot date first, then newest created.
    fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<ValuationSnapshot>>;

    fn count_by_portfolio(&self, portfolio_id: &str) -> Result<i64>;

    /// Snapshot with the greatest date; ties go to the most recently created.
    fn get_latest_for_portfolio(&self, portfolio_id: &str) -> Result<Option<ValuationSnapshot>>;

    /// Filtered, paged listing in the same order as `list_by_portfolio`.
    fn search(&self, filter: &SnapshotFilter, page: PageRequest)
        -> Result<Page<ValuationSnapshot>>;
}

/// Operations of the valuation engine.
#[async_trait]
pub trait ValuationServiceTrait: Send + Sync {
    /// AUM of a portfolio from the holdings valued exactly on `valuation_date`.
    fn calculate_portfolio_aum(&self, portfolio_id: &str, valuation_date: NaiveDate)
        -> Result<Decimal>;

    /// Creates the snapshot for the portfolio and date, or overwrites the
    /// existing one in place.
    async fn create_valuation_snapshot(
        &self,
        new_snapshot: NewValuationSnapshot,
    ) -> Result<ValuationSnapshot>;

    /// Recomputes the AUM of an existing snapshot from current holdings.
    /// Status and notes are left untouched.
    async fn recalculate_snapshot_aum(&self, snapshot_id: &str) -> Result<ValuationSnapshot>;

    /// Moves a snapshot to `new_status`. AUM and notes are left untouched.
    async fn update_snapshot_status(
        &self,
        snapshot_id: &str,
        new_status: &str,
    ) -> Result<ValuationSnapshot>;

    /// Edits status and notes of a snapshot.
    async fn update_snapshot(&self, snapshot_update: SnapshotUpdate) -> Result<ValuationSnapshot>;

    async fn delete_snapshot(&self, snapshot_id: &str) -> Result<()>;

    fn get_snapshot(&self, snapshot_id: &str) -> Result<ValuationSnapshot>;

    fn get_portfolio_holdings_by_date(
        &self,
        portfolio_id: &str,
        valuation_date: NaiveDate,
    ) -> Result<Vec<Holding>>;

    /// All snapshots of a portfolio, newest first.
    fn get_portfolio_valuation_history(&self, portfolio_id: &str)
        -> Result<Vec<ValuationSnapshot>>;

    fn search_snapshots(
        &self,
        filter: SnapshotFilter,
        page: PageRequest,
    ) -> Result<Page<ValuationSnapshot>>;
}
