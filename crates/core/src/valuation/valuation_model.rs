//! Valuation snapshot domain models and the status lifecycle.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{errors::ValidationError, Error, Result};

/// Lifecycle status of a valuation snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SnapshotStatus {
    #[default]
    Draft,
    Confirmed,
    Archived,
}

impl SnapshotStatus {
    pub const ALL: [SnapshotStatus; 3] = [
        SnapshotStatus::Draft,
        SnapshotStatus::Confirmed,
        SnapshotStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotStatus::Draft => "DRAFT",
            SnapshotStatus::Confirmed => "CONFIRMED",
            SnapshotStatus::Archived => "ARCHIVED",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SnapshotStatus::Draft => 0,
            SnapshotStatus::Confirmed => 1,
            SnapshotStatus::Archived => 2,
        }
    }
}

impl fmt::Display for SnapshotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SnapshotStatus {
    type Err = Error;

    /// Parses the exact wire form (`DRAFT`, `CONFIRMED`, `ARCHIVED`).
    fn from_str(s: &str) -> Result<Self> {
        SnapshotStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::Validation(ValidationError::InvalidStatus(s.to_string())))
    }
}

/// Which status transitions a snapshot may take.
///
/// Every status change goes through [`TransitionPolicy::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Any status may move to any other status, including back to DRAFT.
    #[default]
    Unrestricted,
    /// DRAFT -> CONFIRMED -> ARCHIVED; steps may be skipped, never reversed.
    ForwardOnly,
}

impl TransitionPolicy {
    pub fn check(&self, from: SnapshotStatus, to: SnapshotStatus) -> Result<()> {
        let allowed = match self {
            TransitionPolicy::Unrestricted => true,
            TransitionPolicy::ForwardOnly => to.rank() >= from.rank(),
        };
        if allowed {
            Ok(())
        } else {
            Err(Error::Validation(ValidationError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            }))
        }
    }
}

/// Point-in-time record of a portfolio's AUM.
///
/// At most one snapshot exists per `(portfolio_id, snapshot_date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationSnapshot {
    pub id: String,
    pub portfolio_id: String,
    pub snapshot_date: NaiveDate,
    pub status: SnapshotStatus,
    /// Unset until the AUM has been computed.
    pub total_aum: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Request to create (or overwrite) the snapshot for a portfolio and date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewValuationSnapshot {
    pub portfolio_id: String,
    pub snapshot_date: NaiveDate,
    /// Raw status string; DRAFT when absent.
    pub status: Option<String>,
    pub notes: Option<String>,
    /// Compute the AUM from holdings. When false the stored AUM is cleared.
    pub recalculate: bool,
}

/// Mutable columns written by a snapshot upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotFields {
    pub status: SnapshotStatus,
    pub total_aum: Option<Decimal>,
    pub notes: Option<String>,
}

/// General edit of a snapshot. The AUM is not editable here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotUpdate {
    pub id: String,
    pub status: Option<String>,
    /// An empty string clears the notes.
    pub notes: Option<String>,
}

/// Filters for listing snapshots. `None` means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotFilter {
    pub portfolio_id: Option<String>,
    pub status: Option<SnapshotStatus>,
    pub snapshot_date: Option<NaiveDate>,
}

/// Blank notes are stored as absent.
pub(crate) fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes.filter(|n| !n.trim().is_empty())
}
