//! Trades module - the manual trade ledger: entries, closed sells and buy simulation.

mod trades_model;
mod trades_service;
mod trades_traits;

pub use trades_model::{NewTrade, SellTradeRecord, SimulationResult, Trade, TradeInput};
pub use trades_service::{simulate_additional_buy, TradeService};
pub use trades_traits::{TradeRepositoryTrait, TradeServiceTrait};

#[cfg(test)]
mod trades_service_tests;
