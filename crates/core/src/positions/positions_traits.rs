use super::positions_model::{AggregatedPosition, PortfolioTotals, PositionSort};
use crate::errors::Result;
use crate::tabular::ReloadSummary;

/// Trait for position service operations
pub trait PositionServiceTrait: Send + Sync {
    /// Open positions, one per symbol, in the requested order.
    fn get_open_positions(&self, sort: PositionSort) -> Result<Vec<AggregatedPosition>>;

    /// Totals over every raw lot, used by the portfolio index.
    fn get_portfolio_totals(&self) -> Result<PortfolioTotals>;

    /// Re-reads the positions sheet and replaces the cached lots.
    fn reload(&self) -> Result<ReloadSummary>;
}
