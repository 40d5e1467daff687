//! SQLite storage implementation for the trade ledger.

mod model;
mod repository;

pub use model::{NewTradeDB, TradeDB, TradeEntryChangeset};
pub use repository::TradeRepository;
