//! Portfolio domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_NAME_LENGTH;
use crate::holdings::Holding;
use crate::valuation::ValuationSnapshot;
use crate::{errors::ValidationError, Error, Result};

/// A client portfolio. Owns holdings and valuation snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: String,
    pub name: String,
    pub client_name: String,
    pub client_email: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolio {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub client_name: String,
    pub client_email: String,
    pub description: Option<String>,
}

impl NewPortfolio {
    /// Validates the new portfolio data.
    pub fn validate(&self) -> Result<()> {
        validate_portfolio_fields(&self.name, &self.client_name, &self.client_email)
    }
}

/// Partial update for a portfolio. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioUpdate {
    pub id: String,
    pub name: Option<String>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    /// An empty string clears the description.
    pub description: Option<String>,
}

impl PortfolioUpdate {
    /// Applies the present fields onto a stored portfolio and validates the result.
    pub fn apply_to(self, portfolio: &mut Portfolio) -> Result<()> {
        if let Some(name) = self.name {
            portfolio.name = name;
        }
        if let Some(client_name) = self.client_name {
            portfolio.client_name = client_name;
        }
        if let Some(client_email) = self.client_email {
            portfolio.client_email = client_email;
        }
        if let Some(description) = self.description {
            portfolio.description = if description.trim().is_empty() {
                None
            } else {
                Some(description)
            };
        }
        validate_portfolio_fields(
            &portfolio.name,
            &portfolio.client_name,
            &portfolio.client_email,
        )
    }
}

/// A portfolio together with everything it owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioDetail {
    #[serde(flatten)]
    pub portfolio: Portfolio,
    pub holdings: Vec<Holding>,
    pub valuation_snapshots: Vec<ValuationSnapshot>,
}

fn validate_portfolio_fields(name: &str, client_name: &str, client_email: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "Portfolio name cannot be empty".to_string(),
        )));
    }
    if client_name.trim().is_empty() {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "Client name cannot be empty".to_string(),
        )));
    }
    if name.chars().count() > MAX_NAME_LENGTH || client_name.chars().count() > MAX_NAME_LENGTH {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Names cannot be longer than {} characters",
            MAX_NAME_LENGTH
        ))));
    }
    if !is_valid_email(client_email) {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "'{}' is not a valid email address",
            client_email
        ))));
    }
    Ok(())
}

/// Loose structural email check: `local@domain.tld`, no whitespace.
pub(crate) fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && tld.len() >= 2 && !host.ends_with('.'),
        None => false,
    }
}
