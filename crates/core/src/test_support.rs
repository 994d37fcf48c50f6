//! In-memory repositories shared by the service tests.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};

use crate::errors::{Error, Result};
use crate::holdings::{AssetType, Holding, HoldingFilter, HoldingRepositoryTrait, NewHolding};
use crate::pagination::{Page, PageRequest};
use crate::portfolios::{NewPortfolio, Portfolio, PortfolioRepositoryTrait};
use crate::valuation::{
    SnapshotFields, SnapshotFilter, SnapshotRepositoryTrait, SnapshotStatus, ValuationSnapshot,
};

#[derive(Default)]
struct State {
    portfolios: Vec<Portfolio>,
    holdings: Vec<Holding>,
    snapshots: Vec<ValuationSnapshot>,
    clock: i64,
    next_id: u64,
    writes: usize,
}

impl State {
    /// Strictly increasing timestamps so creation order is observable.
    fn tick(&mut self) -> NaiveDateTime {
        self.clock += 1;
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + Duration::seconds(self.clock)
    }

    fn new_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn snapshot_mut(&mut self, snapshot_id: &str) -> Result<&mut ValuationSnapshot> {
        self.snapshots
            .iter_mut()
            .find(|s| s.id == snapshot_id)
            .ok_or_else(|| Error::not_found("Valuation snapshot", snapshot_id))
    }
}

/// One shared fake database backing all three repository traits.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of write operations performed so far.
    pub fn writes(&self) -> usize {
        self.state.lock().unwrap().writes
    }

    pub fn snapshot_count(&self) -> usize {
        self.state.lock().unwrap().snapshots.len()
    }

    pub fn add_portfolio(&self, name: &str) -> Portfolio {
        let mut state = self.state.lock().unwrap();
        let now = state.tick();
        let id = state.new_id("portfolio");
        let portfolio = Portfolio {
            id,
            name: name.to_string(),
            client_name: "Jane Client".to_string(),
            client_email: "jane@example.com".to_string(),
            description: None,
            created_at: now,
            updated_at: now,
        };
        state.portfolios.push(portfolio.clone());
        portfolio
    }

    pub fn add_holding(
        &self,
        portfolio_id: &str,
        asset_name: &str,
        quantity: Decimal,
        unit_price: Decimal,
        valuation_date: NaiveDate,
    ) -> Holding {
        let mut state = self.state.lock().unwrap();
        let now = state.tick();
        let id = state.new_id("holding");
        let holding = Holding {
            id,
            portfolio_id: portfolio_id.to_string(),
            asset_name: asset_name.to_string(),
            asset_type: AssetType::Stock,
            quantity,
            unit_price,
            valuation_date,
            created_at: now,
            updated_at: now,
        };
        state.holdings.push(holding.clone());
        holding
    }
}

fn paginate<T: Clone>(rows: Vec<T>, page: PageRequest) -> Page<T> {
    let total = rows.len() as i64;
    let window = page.window(total);
    let data = rows
        .into_iter()
        .skip(window.offset as usize)
        .take(window.limit as usize)
        .collect();
    Page::new(data, total, window)
}

fn sort_holdings(holdings: &mut [Holding]) {
    holdings.sort_by(|a, b| {
        b.valuation_date
            .cmp(&a.valuation_date)
            .then(a.asset_name.cmp(&b.asset_name))
    });
}

fn sort_snapshots(snapshots: &mut [ValuationSnapshot]) {
    snapshots.sort_by(|a, b| {
        b.snapshot_date
            .cmp(&a.snapshot_date)
            .then(b.created_at.cmp(&a.created_at))
    });
}

#[async_trait]
impl PortfolioRepositoryTrait for InMemoryStore {
    async fn create(&self, new_portfolio: NewPortfolio) -> Result<Portfolio> {
        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        let now = state.tick();
        let id = match new_portfolio.id {
            Some(id) => id,
            None => state.new_id("portfolio"),
        };
        let portfolio = Portfolio {
            id,
            name: new_portfolio.name,
            client_name: new_portfolio.client_name,
            client_email: new_portfolio.client_email,
            description: new_portfolio.description,
            created_at: now,
            updated_at: now,
        };
        state.portfolios.push(portfolio.clone());
        Ok(portfolio)
    }

    async fn update(&self, portfolio: Portfolio) -> Result<Portfolio> {
        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        let now = state.tick();
        let stored = state
            .portfolios
            .iter_mut()
            .find(|p| p.id == portfolio.id)
            .ok_or_else(|| Error::not_found("Portfolio", &portfolio.id))?;
        *stored = Portfolio {
            updated_at: now,
            ..portfolio
        };
        Ok(stored.clone())
    }

    async fn delete(&self, portfolio_id: &str) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        let before = state.portfolios.len();
        state.portfolios.retain(|p| p.id != portfolio_id);
        let deleted = before - state.portfolios.len();
        if deleted > 0 {
            state.holdings.retain(|h| h.portfolio_id != portfolio_id);
            state.snapshots.retain(|s| s.portfolio_id != portfolio_id);
        }
        Ok(deleted)
    }

    fn get_by_id(&self, portfolio_id: &str) -> Result<Portfolio> {
        let state = self.state.lock().unwrap();
        state
            .portfolios
            .iter()
            .find(|p| p.id == portfolio_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Portfolio", portfolio_id))
    }

    fn exists(&self, portfolio_id: &str) -> Result<bool> {
        let state = self.state.lock().unwrap();
        Ok(state.portfolios.iter().any(|p| p.id == portfolio_id))
    }

    fn search(&self, query: Option<&str>, page: PageRequest) -> Result<Page<Portfolio>> {
        let state = self.state.lock().unwrap();
        let needle = query.map(str::to_lowercase);
        let mut rows: Vec<Portfolio> = state
            .portfolios
            .iter()
            .filter(|p| match &needle {
                Some(n) => {
                    p.name.to_lowercase().contains(n)
                        || p.client_name.to_lowercase().contains(n)
                        || p.client_email.to_lowercase().contains(n)
                }
                None => true,
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(rows, page))
    }
}

#[async_trait]
impl HoldingRepositoryTrait for InMemoryStore {
    async fn create(&self, new_holding: NewHolding) -> Result<Holding> {
        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        let now = state.tick();
        let id = match new_holding.id {
            Some(id) => id,
            None => state.new_id("holding"),
        };
        let holding = Holding {
            id,
            portfolio_id: new_holding.portfolio_id,
            asset_name: new_holding.asset_name,
            asset_type: new_holding.asset_type,
            quantity: new_holding.quantity,
            unit_price: new_holding.unit_price,
            valuation_date: new_holding.valuation_date,
            created_at: now,
            updated_at: now,
        };
        state.holdings.push(holding.clone());
        Ok(holding)
    }

    async fn update(&self, holding: Holding) -> Result<Holding> {
        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        let now = state.tick();
        let stored = state
            .holdings
            .iter_mut()
            .find(|h| h.id == holding.id)
            .ok_or_else(|| Error::not_found("Holding", &holding.id))?;
        *stored = Holding {
            updated_at: now,
            ..holding
        };
        Ok(stored.clone())
    }

    async fn delete(&self, holding_id: &str) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        let before = state.holdings.len();
        state.holdings.retain(|h| h.id != holding_id);
        Ok(before - state.holdings.len())
    }

    fn get_by_id(&self, holding_id: &str) -> Result<Holding> {
        let state = self.state.lock().unwrap();
        state
            .holdings
            .iter()
            .find(|h| h.id == holding_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Holding", holding_id))
    }

    fn find_by_portfolio_and_date(
        &self,
        portfolio_id: &str,
        valuation_date: NaiveDate,
    ) -> Result<Vec<Holding>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .holdings
            .iter()
            .filter(|h| h.portfolio_id == portfolio_id && h.valuation_date == valuation_date)
            .cloned()
            .collect())
    }

    fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Holding>> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<Holding> = state
            .holdings
            .iter()
            .filter(|h| h.portfolio_id == portfolio_id)
            .cloned()
            .collect();
        sort_holdings(&mut rows);
        Ok(rows)
    }

    fn count_by_portfolio(&self, portfolio_id: &str) -> Result<i64> {
        let state = self.state.lock().unwrap();
        Ok(state
            .holdings
            .iter()
            .filter(|h| h.portfolio_id == portfolio_id)
            .count() as i64)
    }

    fn search(&self, filter: &HoldingFilter, page: PageRequest) -> Result<Page<Holding>> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<Holding> = state
            .holdings
            .iter()
            .filter(|h| {
                filter
                    .portfolio_id
                    .as_ref()
                    .map_or(true, |p| *p == h.portfolio_id)
                    && filter
                        .valuation_date
                        .map_or(true, |d| d == h.valuation_date)
            })
            .cloned()
            .collect();
        sort_holdings(&mut rows);
        Ok(paginate(rows, page))
    }
}

#[async_trait]
impl SnapshotRepositoryTrait for InMemoryStore {
    async fn upsert(
        &self,
        portfolio_id: &str,
        snapshot_date: NaiveDate,
        fields: SnapshotFields,
    ) -> Result<(ValuationSnapshot, bool)> {
        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        let now = state.tick();
        if let Some(existing) = state
            .snapshots
            .iter_mut()
            .find(|s| s.portfolio_id == portfolio_id && s.snapshot_date == snapshot_date)
        {
            existing.status = fields.status;
            existing.total_aum = fields.total_aum;
            existing.notes = fields.notes;
            existing.updated_at = now;
            return Ok((existing.clone(), false));
        }
        let id = state.new_id("snapshot");
        let snapshot = ValuationSnapshot {
            id,
            portfolio_id: portfolio_id.to_string(),
            snapshot_date,
            status: fields.status,
            total_aum: fields.total_aum,
            notes: fields.notes,
            created_at: now,
            updated_at: now,
        };
        state.snapshots.push(snapshot.clone());
        Ok((snapshot, true))
    }

    fn get_by_id(&self, snapshot_id: &str) -> Result<ValuationSnapshot> {
        let state = self.state.lock().unwrap();
        state
            .snapshots
            .iter()
            .find(|s| s.id == snapshot_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Valuation snapshot", snapshot_id))
    }

    async fn update_total_aum(
        &self,
        snapshot_id: &str,
        total_aum: Decimal,
    ) -> Result<ValuationSnapshot> {
        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        let now = state.tick();
        let snapshot = state.snapshot_mut(snapshot_id)?;
        snapshot.total_aum = Some(total_aum);
        snapshot.updated_at = now;
        Ok(snapshot.clone())
    }

    async fn update_status(
        &self,
        snapshot_id: &str,
        status: SnapshotStatus,
    ) -> Result<ValuationSnapshot> {
        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        let now = state.tick();
        let snapshot = state.snapshot_mut(snapshot_id)?;
        snapshot.status = status;
        snapshot.updated_at = now;
        Ok(snapshot.clone())
    }

    async fn update_details(
        &self,
        snapshot_id: &str,
        status: SnapshotStatus,
        notes: Option<String>,
    ) -> Result<ValuationSnapshot> {
        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        let now = state.tick();
        let snapshot = state.snapshot_mut(snapshot_id)?;
        snapshot.status = status;
        snapshot.notes = notes;
        snapshot.updated_at = now;
        Ok(snapshot.clone())
    }

    async fn delete(&self, snapshot_id: &str) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        let before = state.snapshots.len();
        state.snapshots.retain(|s| s.id != snapshot_id);
        Ok(before - state.snapshots.len())
    }

    fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<ValuationSnapshot>> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<ValuationSnapshot> = state
            .snapshots
            .iter()
            .filter(|s| s.portfolio_id == portfolio_id)
            .cloned()
            .collect();
        sort_snapshots(&mut rows);
        Ok(rows)
    }

    fn count_by_portfolio(&self, portfolio_id: &str) -> Result<i64> {
        Ok(SnapshotRepositoryTrait::list_by_portfolio(self, portfolio_id)?.len() as i64)
    }

    fn get_latest_for_portfolio(&self, portfolio_id: &str) -> Result<Option<ValuationSnapshot>> {
        Ok(SnapshotRepositoryTrait::list_by_portfolio(self, portfolio_id)?
            .into_iter()
            .next())
    }

    fn search(
        &self,
        filter: &SnapshotFilter,
        page: PageRequest,
    ) -> Result<Page<ValuationSnapshot>> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<ValuationSnapshot> = state
            .snapshots
            .iter()
            .filter(|s| {
                filter
                    .portfolio_id
                    .as_ref()
                    .map_or(true, |p| *p == s.portfolio_id)
                    && filter.status.map_or(true, |st| st == s.status)
                    && filter.snapshot_date.map_or(true, |d| d == s.snapshot_date)
            })
            .cloned()
            .collect();
        sort_snapshots(&mut rows);
        Ok(paginate(rows, page))
    }
}
