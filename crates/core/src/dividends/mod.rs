//! Dividends module - disbursement records and their summaries.

mod dividends_model;
mod dividends_service;

pub use dividends_model::{DividendByTicker, DividendByYear, DividendRecord, DividendSummary};
pub use dividends_service::{summarise_dividends, DividendService, DividendServiceTrait};
