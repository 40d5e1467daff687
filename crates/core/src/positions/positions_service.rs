use log::debug;
use std::sync::Arc;

use super::aggregator::{aggregate_positions, portfolio_totals, sort_positions};
use super::positions_model::{AggregatedPosition, PortfolioTotals, PositionLot, PositionSort};
use super::positions_traits::PositionServiceTrait;
use crate::errors::Result;
use crate::tabular::{DatasetCache, ReloadSummary, TabularSourceTrait};

/// Serves open positions from the cached positions sheet.
pub struct PositionService {
    lots: DatasetCache<PositionLot>,
}

impl PositionService {
    pub fn new(source: Arc<dyn TabularSourceTrait>) -> Self {
        Self {
            lots: DatasetCache::new(source),
        }
    }
}

impl PositionServiceTrait for PositionService {
    fn get_open_positions(&self, sort: PositionSort) -> Result<Vec<AggregatedPosition>> {
        let dataset = self.lots.get()?;
        let mut positions = aggregate_positions(&dataset.records);
        sort_positions(&mut positions, sort);
        debug!(
            "Aggregated {} lots into {} open positions (dataset version {})",
            dataset.records.len(),
            positions.len(),
            dataset.version
        );
        Ok(positions)
    }

    fn get_portfolio_totals(&self) -> Result<PortfolioTotals> {
        let dataset = self.lots.get()?;
        Ok(portfolio_totals(&dataset.records))
    }

    fn reload(&self) -> Result<ReloadSummary> {
        self.lots.reload()
    }
}
