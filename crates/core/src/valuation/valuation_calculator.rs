use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::AUM_DECIMAL_PLACES;
use crate::errors::{Error, Result};
use crate::holdings::Holding;

/// Sums `quantity * unit_price` over `holdings` and rounds the total once,
/// half-up, to `AUM_DECIMAL_PLACES`.
///
/// The caller selects which holdings take part; this function does not look
/// at portfolio or date. An empty slice yields `0.00`.
pub fn calculate_aum(holdings: &[Holding]) -> Result<Decimal> {
    let mut total = Decimal::ZERO;
    for holding in holdings {
        let value = holding.checked_total_value().ok_or_else(|| {
            Error::Unexpected(format!(
                "Market value of holding {} overflows",
                holding.id
            ))
        })?;
        total = total.checked_add(value).ok_or_else(|| {
            Error::Unexpected("Portfolio AUM overflows the decimal range".to_string())
        })?;
    }

    let mut aum =
        total.round_dp_with_strategy(AUM_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    // Keep a fixed scale so 15050 is reported as 15050.00.
    aum.rescale(AUM_DECIMAL_PLACES);
    Ok(aum)
}
