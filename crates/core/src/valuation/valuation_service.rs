use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::valuation_calculator::calculate_aum;
use super::valuation_model::{
    normalize_notes, NewValuationSnapshot, SnapshotFields, SnapshotFilter, SnapshotStatus,
    SnapshotUpdate, TransitionPolicy, ValuationSnapshot,
};
use super::valuation_traits::{SnapshotRepositoryTrait, ValuationServiceTrait};
use crate::errors::{Error, Result};
use crate::holdings::{Holding, HoldingRepositoryTrait};
use crate::pagination::{Page, PageRequest};
use crate::portfolios::PortfolioRepositoryTrait;
use crate::utils::time_utils::validate_date_range;

#[derive(Clone)]
pub struct ValuationService {
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    holding_repository: Arc<dyn HoldingRepositoryTrait>,
    snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
    transition_policy: TransitionPolicy,
}

impl ValuationService {
    pub fn new(
        portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
        holding_repository: Arc<dyn HoldingRepositoryTrait>,
        snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
    ) -> Self {
        Self {
            portfolio_repository,
            holding_repository,
            snapshot_repository,
            transition_policy: TransitionPolicy::default(),
        }
    }

    pub fn with_transition_policy(mut self, transition_policy: TransitionPolicy) -> Self {
        self.transition_policy = transition_policy;
        self
    }

    fn ensure_portfolio_exists(&self, portfolio_id: &str) -> Result<()> {
        if self.portfolio_repository.exists(portfolio_id)? {
            Ok(())
        } else {
            Err(Error::not_found("Portfolio", portfolio_id))
        }
    }

    /// Aggregates holdings for a portfolio/date without checking the portfolio.
    fn aggregate(&self, portfolio_id: &str, valuation_date: NaiveDate) -> Result<Decimal> {
        let holdings = self
            .holding_repository
            .find_by_portfolio_and_date(portfolio_id, valuation_date)?;
        let aum = calculate_aum(&holdings)?;
        debug!(
            "AUM for portfolio {} on {}: {} across {} holdings",
            portfolio_id,
            valuation_date,
            aum,
            holdings.len()
        );
        Ok(aum)
    }
}

#[async_trait]
impl ValuationServiceTrait for ValuationService {
    fn calculate_portfolio_aum(
        &self,
        portfolio_id: &str,
        valuation_date: NaiveDate,
    ) -> Result<Decimal> {
        self.ensure_portfolio_exists(portfolio_id)?;
        self.aggregate(portfolio_id, valuation_date)
    }

    async fn create_valuation_snapshot(
        &self,
        new_snapshot: NewValuationSnapshot,
    ) -> Result<ValuationSnapshot> {
        let NewValuationSnapshot {
            portfolio_id,
            snapshot_date,
            status,
            notes,
            recalculate,
        } = new_snapshot;

        // Reject a bad status before touching storage.
        let status = match status.as_deref() {
            Some(raw) => raw.parse::<SnapshotStatus>()?,
            None => SnapshotStatus::default(),
        };
        validate_date_range("Snapshot date", snapshot_date)?;
        self.ensure_portfolio_exists(&portfolio_id)?;

        let total_aum = if recalculate {
            Some(self.aggregate(&portfolio_id, snapshot_date)?)
        } else {
            None
        };

        let fields = SnapshotFields {
            status,
            total_aum,
            notes: normalize_notes(notes),
        };
        let (snapshot, created) = self
            .snapshot_repository
            .upsert(&portfolio_id, snapshot_date, fields)
            .await?;

        info!(
            "{} valuation snapshot {} for portfolio {} on {} ({})",
            if created { "Created" } else { "Overwrote" },
            snapshot.id,
            portfolio_id,
            snapshot_date,
            snapshot.status
        );
        Ok(snapshot)
    }

    async fn recalculate_snapshot_aum(&self, snapshot_id: &str) -> Result<ValuationSnapshot> {
        let snapshot = self.snapshot_repository.get_by_id(snapshot_id)?;
        let total_aum = self.aggregate(&snapshot.portfolio_id, snapshot.snapshot_date)?;
        debug!(
            "Recalculated snapshot {} ({}): {:?} -> {}",
            snapshot.id, snapshot.status, snapshot.total_aum, total_aum
        );
        self.snapshot_repository
            .update_total_aum(snapshot_id, total_aum)
            .await
    }

    async fn update_snapshot_status(
        &self,
        snapshot_id: &str,
        new_status: &str,
    ) -> Result<ValuationSnapshot> {
        let new_status = new_status.parse::<SnapshotStatus>()?;
        let current = self.snapshot_repository.get_by_id(snapshot_id)?;
        self.transition_policy.check(current.status, new_status)?;

        debug!(
            "Snapshot {} status {} -> {}",
            snapshot_id, current.status, new_status
        );
        self.snapshot_repository
            .update_status(snapshot_id, new_status)
            .await
    }

    async fn update_snapshot(&self, snapshot_update: SnapshotUpdate) -> Result<ValuationSnapshot> {
        let new_status = snapshot_update
            .status
            .as_deref()
            .map(str::parse::<SnapshotStatus>)
            .transpose()?;
        let current = self.snapshot_repository.get_by_id(&snapshot_update.id)?;

        let status = match new_status {
            Some(status) => {
                self.transition_policy.check(current.status, status)?;
                status
            }
            None => current.status,
        };
        let notes = match snapshot_update.notes {
            Some(notes) => normalize_notes(Some(notes)),
            None => current.notes,
        };

        self.snapshot_repository
            .update_details(&snapshot_update.id, status, notes)
            .await
    }

    async fn delete_snapshot(&self, snapshot_id: &str) -> Result<()> {
        if self.snapshot_repository.delete(snapshot_id).await? == 0 {
            return Err(Error::not_found("Valuation snapshot", snapshot_id));
        }
        debug!("Deleted valuation snapshot {}", snapshot_id);
        Ok(())
    }

    fn get_snapshot(&self, snapshot_id: &str) -> Result<ValuationSnapshot> {
        self.snapshot_repository.get_by_id(snapshot_id)
    }

    fn get_portfolio_holdings_by_date(
        &self,
        portfolio_id: &str,
        valuation_date: NaiveDate,
    ) -> Result<Vec<Holding>> {
        self.ensure_portfolio_exists(portfolio_id)?;
        self.holding_repository
            .find_by_portfolio_and_date(portfolio_id, valuation_date)
    }

    fn get_portfolio_valuation_history(
        &self,
        portfolio_id: &str,
    ) -> Result<Vec<ValuationSnapshot>> {
        self.ensure_portfolio_exists(portfolio_id)?;
        self.snapshot_repository.list_by_portfolio(portfolio_id)
    }

    fn search_snapshots(
        &self,
        filter: SnapshotFilter,
        page: PageRequest,
    ) -> Result<Page<ValuationSnapshot>> {
        self.snapshot_repository.search(&filter, page)
    }
}
