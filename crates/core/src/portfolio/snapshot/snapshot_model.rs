//! Snapshot domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::positions::PortfolioTotals;
use crate::utils::money::{round_money, serialize_money, serialize_opt_money};

/// One trading day's portfolio state. At most one per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_money")]
    pub market_value: Decimal,
    #[serde(serialize_with = "serialize_money")]
    pub total_cost_value: Decimal,
    #[serde(serialize_with = "serialize_money")]
    pub total_pnl: Decimal,
    #[serde(serialize_with = "serialize_money")]
    pub daily_pnl_sum: Decimal,
    #[serde(serialize_with = "serialize_money")]
    pub portfolio_index_value: Decimal,
    #[serde(serialize_with = "serialize_money")]
    pub net_cash_flow_today: Decimal,
}

impl PortfolioSnapshot {
    pub fn from_totals(
        date: NaiveDate,
        totals: &PortfolioTotals,
        portfolio_index_value: Decimal,
        net_cash_flow_today: Decimal,
    ) -> Self {
        Self {
            date,
            market_value: totals.current_market_value,
            total_cost_value: totals.total_cost_value,
            total_pnl: totals.total_pnl,
            daily_pnl_sum: totals.daily_pnl_sum,
            portfolio_index_value,
            net_cash_flow_today,
        }
    }

    /// Every figure cut to two places, as persisted. P&L is recomputed from
    /// the rounded market and cost values.
    pub fn rounded(&self) -> Self {
        let market_value = round_money(self.market_value);
        let total_cost_value = round_money(self.total_cost_value);
        Self {
            date: self.date,
            market_value,
            total_cost_value,
            total_pnl: market_value - total_cost_value,
            daily_pnl_sum: round_money(self.daily_pnl_sum),
            portfolio_index_value: round_money(self.portfolio_index_value),
            net_cash_flow_today: round_money(self.net_cash_flow_today),
        }
    }
}

/// Result of the persisting snapshot operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotOutcome {
    pub message: String,
    pub snapshot: PortfolioSnapshot,
    /// True when a snapshot for the same date existed and was replaced.
    pub replaced_existing: bool,
}

/// Intraday preview of today's index value; nothing is stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveIndex {
    #[serde(serialize_with = "serialize_money")]
    pub live_portfolio_index_value: Decimal,
    #[serde(serialize_with = "serialize_money")]
    pub current_market_value: Decimal,
    #[serde(serialize_with = "serialize_money")]
    pub total_cost_value: Decimal,
    #[serde(serialize_with = "serialize_money")]
    pub total_pnl: Decimal,
    #[serde(serialize_with = "serialize_money")]
    pub daily_pnl_sum: Decimal,
    pub previous_snapshot_date: Option<NaiveDate>,
    #[serde(serialize_with = "serialize_opt_money")]
    pub previous_index_value: Option<Decimal>,
}
