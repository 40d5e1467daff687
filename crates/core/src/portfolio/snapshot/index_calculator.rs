//! Chain-linked, cash-flow-adjusted portfolio index.
//!
//! Each day's value is the previous value times one plus the day's return,
//! where the return treats the day's net cash flow as arriving at mid-day:
//!
//! ```text
//! denominator = pmv_yesterday + 0.5 * F
//! rate        = (cmv - pmv_yesterday - F) / denominator
//! index_today = index_yesterday * (1 + rate)
//! ```
//!
//! All arithmetic is done at full decimal precision; callers round when
//! persisting or serialising.

use rust_decimal::Decimal;

use super::snapshot_model::PortfolioSnapshot;
use crate::constants::{CASH_FLOW_WEIGHT, INDEX_BASE_VALUE};
use crate::errors::{Error, Result};

/// The figures of the previous snapshot the index chains from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorSnapshot {
    pub market_value: Decimal,
    pub index_value: Decimal,
}

impl From<&PortfolioSnapshot> for PriorSnapshot {
    fn from(snapshot: &PortfolioSnapshot) -> Self {
        Self {
            market_value: snapshot.market_value,
            index_value: snapshot.portfolio_index_value,
        }
    }
}

/// Today's index value given the prior snapshot (if any), today's market
/// value and today's net cash flow.
///
/// - No prior snapshot: the base value 100.
/// - Prior base at or below zero while fresh capital arrives into a
///   positive portfolio: the index restarts at 100.
/// - Positive denominator: chain-linked return.
/// - Otherwise the index carries over unchanged.
pub fn compute_index_value(
    prior: Option<PriorSnapshot>,
    current_market_value: Decimal,
    net_cash_flow: Decimal,
) -> Result<Decimal> {
    let Some(prior) = prior else {
        return Ok(INDEX_BASE_VALUE);
    };
    let overflow = || {
        Error::Calculation(format!(
            "index overflows for market value {} with prior {} and cash flow {}",
            current_market_value, prior.market_value, net_cash_flow
        ))
    };

    let denominator = CASH_FLOW_WEIGHT
        .checked_mul(net_cash_flow)
        .and_then(|weighted| prior.market_value.checked_add(weighted))
        .ok_or_else(overflow)?;
    let rebuilt = current_market_value > Decimal::ZERO && net_cash_flow > Decimal::ZERO;
    if rebuilt && (prior.market_value <= Decimal::ZERO || denominator <= Decimal::ZERO) {
        return Ok(INDEX_BASE_VALUE);
    }

    if denominator > Decimal::ZERO {
        return current_market_value
            .checked_sub(prior.market_value)
            .and_then(|gain| gain.checked_sub(net_cash_flow))
            .and_then(|gain| gain.checked_div(denominator))
            .and_then(|rate| Decimal::ONE.checked_add(rate))
            .and_then(|growth| prior.index_value.checked_mul(growth))
            .ok_or_else(overflow);
    }

    // A zero index over an empty portfolio stays at zero, which carrying
    // the prior value already gives.
    Ok(prior.index_value)
}
