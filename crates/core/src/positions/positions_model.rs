//! Position lot and aggregated position models.

use chrono::NaiveDate;
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::RowError;
use crate::tabular::{FieldKind, FieldSpec, FromRecord, Record};
use crate::utils::money::serialize_money;

/// One raw position record (one buy) from the positions sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PositionLot {
    pub symbol: String,
    pub ticker: String,
    pub sector: String,
    pub account: String,
    pub pos_age: String,
    pub buy_date: Option<NaiveDate>,
    pub qty: Decimal,
    pub avg_price: Decimal,
    pub current_price: Decimal,
    pub daily_change: Decimal,
    pub daily_pnl: Decimal,
    pub tradevalue: Decimal,
    pub market_value: Decimal,
    pub total_pnl: Decimal,
    pub pct_pnl: Decimal,
    pub tvm: Decimal,
}

impl PositionLot {
    /// Symbol used as the grouping key: trimmed and upper-cased.
    pub fn normalized_symbol(&self) -> String {
        self.symbol.trim().to_uppercase()
    }
}

fn decimal_field(record: &Record, column: &'static str) -> Result<Decimal, RowError> {
    Decimal::from_f64(record.number(column)).ok_or(RowError::NonFiniteNumber { column })
}

impl FromRecord for PositionLot {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("symbol", FieldKind::Symbol),
        FieldSpec::new("ticker", FieldKind::Text),
        FieldSpec::new("sector", FieldKind::Text),
        FieldSpec::new("account", FieldKind::Text),
        FieldSpec::new("pos_age", FieldKind::Text),
        FieldSpec::new("buy_date", FieldKind::Date),
        FieldSpec::new("qty", FieldKind::Integer),
        FieldSpec::new("avg_price", FieldKind::Number),
        FieldSpec::new("current_price", FieldKind::Number),
        FieldSpec::new("daily_change", FieldKind::Number),
        FieldSpec::new("daily_pnl", FieldKind::Number),
        FieldSpec::new("tradevalue", FieldKind::Number),
        FieldSpec::new("market_value", FieldKind::Number),
        FieldSpec::new("total_pnl", FieldKind::Number),
        FieldSpec::new("pct_pnl", FieldKind::Number),
        FieldSpec::new("tvm", FieldKind::Number),
    ];

    fn from_record(record: &Record) -> Result<Self, RowError> {
        Ok(PositionLot {
            symbol: record.text("symbol").to_string(),
            ticker: record.text("ticker").to_string(),
            sector: record.text("sector").to_string(),
            account: record.text("account").to_string(),
            pos_age: record.text("pos_age").to_string(),
            buy_date: record.date("buy_date"),
            qty: decimal_field(record, "qty")?,
            avg_price: decimal_field(record, "avg_price")?,
            current_price: decimal_field(record, "current_price")?,
            daily_change: decimal_field(record, "daily_change")?,
            daily_pnl: decimal_field(record, "daily_pnl")?,
            tradevalue: decimal_field(record, "tradevalue")?,
            market_value: decimal_field(record, "market_value")?,
            total_pnl: decimal_field(record, "total_pnl")?,
            pct_pnl: decimal_field(record, "pct_pnl")?,
            tvm: decimal_field(record, "tvm")?,
        })
    }
}

/// One open security, summarised across its lots.
///
/// Descriptive fields and the sheet's own figures (`sheet_*`, `tvm`, daily
/// figures, current price) come from the first lot seen for the symbol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedPosition {
    pub symbol: String,
    pub ticker: String,
    pub sector: String,
    pub account: String,
    pub pos_age: String,
    pub first_buy_date: Option<NaiveDate>,
    pub total_qty: Decimal,
    pub total_cost: Decimal,
    pub avg_price: Decimal,
    pub current_price: Decimal,
    pub market_value: Decimal,
    pub pnl: Decimal,
    pub pct_pnl: Decimal,
    pub daily_change: Decimal,
    pub daily_pnl: Decimal,
    pub tvm: Decimal,
    pub sheet_tradevalue: Decimal,
    pub sheet_market_value: Decimal,
    pub sheet_total_pnl: Decimal,
    pub sheet_pct_pnl: Decimal,
}

/// Portfolio-wide totals over every raw lot, feeding the index engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioTotals {
    pub lot_count: usize,
    #[serde(serialize_with = "serialize_money")]
    pub current_market_value: Decimal,
    #[serde(serialize_with = "serialize_money")]
    pub total_cost_value: Decimal,
    #[serde(serialize_with = "serialize_money")]
    pub total_pnl: Decimal,
    #[serde(serialize_with = "serialize_money")]
    pub daily_pnl_sum: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PositionSortKey {
    #[default]
    DailyChange,
    Symbol,
    MarketValue,
    Pnl,
    PctPnl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Presentation order requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PositionSort {
    pub key: PositionSortKey,
    pub order: SortOrder,
}
