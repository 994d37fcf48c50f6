use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Summary counts and the most recent valuation of a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioStatistics {
    pub portfolio_id: String,
    pub total_holdings: i64,
    pub total_snapshots: i64,
    /// `None` when the portfolio has no snapshots.
    pub latest_snapshot_date: Option<NaiveDate>,
    /// AUM of the latest snapshot; `None` when there is no snapshot or its AUM was never computed.
    pub latest_aum: Option<Decimal>,
}
