use async_trait::async_trait;

use super::trades_model::{NewTrade, SellTradeRecord, SimulationResult, Trade, TradeInput};
use crate::errors::Result;

/// Trait for trade ledger storage
#[async_trait]
pub trait TradeRepositoryTrait: Send + Sync {
    async fn insert_trade(&self, new_trade: NewTrade) -> Result<Trade>;

    /// Rewrites the entry columns of an existing row; realised figures are
    /// left untouched. Fails with `NotFound` when no row has `id`.
    async fn update_trade(&self, id: i32, changes: NewTrade) -> Result<Trade>;

    /// Closed sells, newest sell date first.
    fn list_realised(&self) -> Result<Vec<Trade>>;

    /// Every row, oldest buy date first; rows without a buy date lead.
    fn list_all(&self) -> Result<Vec<Trade>>;

    /// Rows of `symbol` with no sell date and a positive quantity.
    fn list_open_lots(&self, symbol: &str) -> Result<Vec<Trade>>;
}

/// Trait for trade ledger operations
#[async_trait]
pub trait TradeServiceTrait: Send + Sync {
    async fn create_trade(&self, input: TradeInput) -> Result<Trade>;
    async fn update_trade(&self, id: i32, input: TradeInput) -> Result<Trade>;
    async fn record_sell(&self, record: SellTradeRecord) -> Result<Trade>;
    fn simulate_buy(&self, input: &TradeInput) -> Result<SimulationResult>;
    fn get_realised_trades(&self) -> Result<Vec<Trade>>;
    fn get_all_trades(&self) -> Result<Vec<Trade>>;
}
