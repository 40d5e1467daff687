//! Tradebook Core - domain entities, services, and traits.
//!
//! This crate holds the business logic of the trade book: spreadsheet
//! datasets, position aggregation, the trade ledger, dividends and the
//! portfolio index. It is database-agnostic and defines traits that are
//! implemented by the `storage-sqlite` and `spreadsheet` crates.

pub mod constants;
pub mod dividends;
pub mod errors;
pub mod portfolio;
pub mod positions;
pub mod tabular;
pub mod trades;
pub mod utils;

pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
