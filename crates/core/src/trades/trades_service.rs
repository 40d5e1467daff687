use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;

use super::trades_model::{SellTradeRecord, SimulationResult, Trade, TradeInput};
use super::trades_traits::{TradeRepositoryTrait, TradeServiceTrait};
use crate::errors::{Result, ValidationError};
use crate::utils::money::round_f64;

pub struct TradeService {
    repository: Arc<dyn TradeRepositoryTrait>,
}

impl TradeService {
    pub fn new(repository: Arc<dyn TradeRepositoryTrait>) -> Self {
        Self { repository }
    }
}

/// Blends open lots with a hypothetical buy of `qty` at `price`.
///
/// Open lots without a stored buy price count as zero cost. Quantities
/// whose sum does not fit in an `i64` are rejected.
pub fn simulate_additional_buy(
    open_lots: &[Trade],
    qty: i64,
    price: f64,
) -> Result<SimulationResult> {
    let overflow = || {
        ValidationError::InvalidInput(format!(
            "Quantity {} overflows when added to the open lots",
            qty
        ))
    };
    let (existing_qty, existing_cost) =
        open_lots
            .iter()
            .try_fold((0i64, 0f64), |(q, c), lot| -> Result<(i64, f64)> {
                let q = q.checked_add(lot.qty).ok_or_else(overflow)?;
                Ok((q, c + lot.qty as f64 * lot.buy_price.unwrap_or(0.0)))
            })?;
    let total_qty = existing_qty.checked_add(qty).ok_or_else(overflow)?;
    let total_cost = existing_cost + qty as f64 * price;
    let simulated_avg_price = if total_qty == 0 {
        0.0
    } else {
        round_f64(total_cost / total_qty as f64)
    };
    Ok(SimulationResult {
        simulated_avg_price,
        simulated_qty: total_qty,
    })
}

#[async_trait]
impl TradeServiceTrait for TradeService {
    async fn create_trade(&self, input: TradeInput) -> Result<Trade> {
        let new_trade = input.into_new_trade()?;
        let trade = self.repository.insert_trade(new_trade).await?;
        info!("Recorded trade {} for {}", trade.id, trade.symbol);
        Ok(trade)
    }

    async fn update_trade(&self, id: i32, input: TradeInput) -> Result<Trade> {
        let changes = input.into_new_trade()?;
        self.repository.update_trade(id, changes).await
    }

    async fn record_sell(&self, record: SellTradeRecord) -> Result<Trade> {
        let new_trade = record.into_new_trade()?;
        let trade = self.repository.insert_trade(new_trade).await?;
        info!(
            "Recorded sell of {} (trade {}) sold on {:?}",
            trade.symbol, trade.id, trade.sell_date
        );
        Ok(trade)
    }

    fn simulate_buy(&self, input: &TradeInput) -> Result<SimulationResult> {
        let symbol = input.validate()?;
        let open_lots = self.repository.list_open_lots(&symbol)?;
        debug!("Simulating buy of {} against {} open lots", symbol, open_lots.len());
        simulate_additional_buy(&open_lots, input.qty, input.buy_price)
    }

    fn get_realised_trades(&self) -> Result<Vec<Trade>> {
        let trades = self.repository.list_realised()?;
        Ok(trades.into_iter().map(Trade::with_rounded_figures).collect())
    }

    fn get_all_trades(&self) -> Result<Vec<Trade>> {
        let trades = self.repository.list_all()?;
        Ok(trades.into_iter().map(Trade::with_rounded_figures).collect())
    }
}
