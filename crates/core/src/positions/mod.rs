//! Positions module - lot records, per-symbol aggregation and portfolio totals.

mod aggregator;
mod positions_model;
mod positions_service;
mod positions_traits;

pub use aggregator::{aggregate_positions, portfolio_totals, sort_positions};
pub use positions_model::{
    AggregatedPosition, PortfolioTotals, PositionLot, PositionSort, PositionSortKey, SortOrder,
};
pub use positions_service::PositionService;
pub use positions_traits::PositionServiceTrait;

#[cfg(test)]
mod aggregator_tests;
