use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::index_calculator::{compute_index_value, PriorSnapshot};
use super::snapshot_model::{LiveIndex, PortfolioSnapshot, SnapshotOutcome};
use super::snapshot_traits::{SnapshotRepositoryTrait, SnapshotServiceTrait};
use crate::errors::{PolicyViolation, Result};
use crate::positions::{PortfolioTotals, PositionServiceTrait};
use crate::utils::time_utils::is_trading_day;

/// Takes daily snapshots of the portfolio and chains the index through them.
pub struct SnapshotService {
    repository: Arc<dyn SnapshotRepositoryTrait>,
    position_service: Arc<dyn PositionServiceTrait>,
}

/// Today's figures before anything is stored.
struct IndexComputation {
    totals: PortfolioTotals,
    prior: Option<PortfolioSnapshot>,
    index_value: Decimal,
}

impl SnapshotService {
    pub fn new(
        repository: Arc<dyn SnapshotRepositoryTrait>,
        position_service: Arc<dyn PositionServiceTrait>,
    ) -> Self {
        Self {
            repository,
            position_service,
        }
    }

    /// Chains from the latest snapshot before `today`, so a same-day repeat
    /// never builds on the row it is about to replace.
    fn compute(&self, net_cash_flow: Decimal, today: NaiveDate) -> Result<IndexComputation> {
        let totals = self.position_service.get_portfolio_totals()?;
        let prior = self.repository.get_latest_before(today)?;
        let index_value = compute_index_value(
            prior.as_ref().map(PriorSnapshot::from),
            totals.current_market_value,
            net_cash_flow,
        )?;
        debug!(
            "Index for {}: prior {:?}, market value {}, cash flow {} -> {}",
            today,
            prior.as_ref().map(|p| p.date),
            totals.current_market_value,
            net_cash_flow,
            index_value
        );
        Ok(IndexComputation {
            totals,
            prior,
            index_value,
        })
    }
}

#[async_trait]
impl SnapshotServiceTrait for SnapshotService {
    async fn take_snapshot(
        &self,
        net_cash_flow: Decimal,
        today: NaiveDate,
    ) -> Result<SnapshotOutcome> {
        if !is_trading_day(today) {
            warn!("Rejected snapshot request for {} (weekend)", today);
            return Err(PolicyViolation::WeekendSnapshot {
                date: today,
                weekday: today.weekday().to_string(),
            }
            .into());
        }

        let computation = self.compute(net_cash_flow, today)?;
        let snapshot = PortfolioSnapshot::from_totals(
            today,
            &computation.totals,
            computation.index_value,
            net_cash_flow,
        )
        .rounded();

        let replaced_existing = self.repository.replace_for_date(snapshot.clone()).await?;
        let message = if replaced_existing {
            format!("Portfolio snapshot for {} updated", today)
        } else {
            format!("Portfolio snapshot for {} saved", today)
        };
        info!(
            "{} (index {}, market value {})",
            message, snapshot.portfolio_index_value, snapshot.market_value
        );

        Ok(SnapshotOutcome {
            message,
            snapshot,
            replaced_existing,
        })
    }

    fn calculate_live_index(&self, net_cash_flow: Decimal, today: NaiveDate) -> Result<LiveIndex> {
        let computation = self.compute(net_cash_flow, today)?;
        let totals = computation.totals;
        Ok(LiveIndex {
            live_portfolio_index_value: computation.index_value,
            current_market_value: totals.current_market_value,
            total_cost_value: totals.total_cost_value,
            total_pnl: totals.total_pnl,
            daily_pnl_sum: totals.daily_pnl_sum,
            previous_snapshot_date: computation.prior.as_ref().map(|p| p.date),
            previous_index_value: computation.prior.map(|p| p.portfolio_index_value),
        })
    }

    fn get_history(&self) -> Result<Vec<PortfolioSnapshot>> {
        self.repository.list_all()
    }
}
