use chrono::Datelike;
use log::debug;
use rust_decimal::Decimal;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::dividends_model::{DividendByTicker, DividendByYear, DividendRecord, DividendSummary};
use crate::errors::Result;
use crate::tabular::{DatasetCache, ReloadSummary, TabularSourceTrait};

pub trait DividendServiceTrait: Send + Sync {
    fn get_summary(&self) -> Result<DividendSummary>;

    fn reload(&self) -> Result<ReloadSummary>;
}

pub struct DividendService {
    records: DatasetCache<DividendRecord>,
}

impl DividendService {
    pub fn new(source: Arc<dyn TabularSourceTrait>) -> Self {
        Self {
            records: DatasetCache::new(source),
        }
    }
}

impl DividendServiceTrait for DividendService {
    fn get_summary(&self) -> Result<DividendSummary> {
        let dataset = self.records.get()?;
        debug!(
            "Summarising {} dividend rows (dataset version {})",
            dataset.records.len(),
            dataset.version
        );
        Ok(summarise_dividends(&dataset.records))
    }

    fn reload(&self) -> Result<ReloadSummary> {
        self.records.reload()
    }
}

/// Builds the per-ticker and per-year totals.
///
/// Raw rows are ordered newest first with undated rows last. Undated rows
/// count toward the ticker totals and the grand total but not toward any year.
pub fn summarise_dividends(records: &[DividendRecord]) -> DividendSummary {
    let mut raw_data = records.to_vec();
    raw_data.sort_by_key(|r| (r.date_of_disbur.is_none(), Reverse(r.date_of_disbur)));

    let mut ticker_order: Vec<String> = Vec::new();
    let mut by_ticker: HashMap<String, Decimal> = HashMap::new();
    let mut by_year: BTreeMap<i32, Decimal> = BTreeMap::new();
    let mut total = Decimal::ZERO;

    for record in records {
        let entry = by_ticker.entry(record.ticker.clone()).or_insert_with(|| {
            ticker_order.push(record.ticker.clone());
            Decimal::ZERO
        });
        *entry += record.amount;
        if let Some(date) = record.date_of_disbur {
            *by_year.entry(date.year()).or_insert(Decimal::ZERO) += record.amount;
        }
        total += record.amount;
    }

    let mut chart_data: Vec<DividendByTicker> = ticker_order
        .into_iter()
        .map(|ticker| {
            let total_amount = by_ticker.get(&ticker).copied().unwrap_or_default();
            DividendByTicker {
                ticker,
                total_amount,
            }
        })
        .collect();
    chart_data.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));

    DividendSummary {
        raw_data,
        chart_data,
        dividends_by_year: by_year
            .into_iter()
            .map(|(year, total_amount)| DividendByYear { year, total_amount })
            .collect(),
        total_dividend_earned: total,
    }
}
