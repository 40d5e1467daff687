//! Trade ledger domain models.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::constants::{DEFAULT_SELL_NOTE, TRADE_TYPE_SELL};
use crate::errors::{Result, ValidationError};
use crate::utils::money::{round_f64, round_opt_f64};

static SYMBOL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("Invalid regex pattern"));

/// A stored ledger row, either an open entry or a closed (realised) sell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trade {
    pub id: i32,
    pub ticker: Option<String>,
    pub symbol: String,
    pub sector: Option<String>,
    pub buy_date: Option<NaiveDate>,
    pub sell_date: Option<NaiveDate>,
    pub buy_price: Option<f64>,
    pub sell_price: Option<f64>,
    pub qty: i64,
    #[serde(rename = "type")]
    pub trade_type: Option<String>,
    pub note: Option<String>,
    pub strategy: Option<String>,
    pub tradevalue: Option<f64>,
    pub market_value: Option<f64>,
    pub total_pnl: Option<f64>,
    pub pct_pnl: Option<f64>,
    pub tvm: Option<f64>,
    pub pos_age: Option<String>,
}

impl Trade {
    /// A sell recorded against a closed position.
    pub fn is_realised(&self) -> bool {
        self.sell_date.is_some() && self.qty == 0 && self.trade_type.as_deref() == Some(TRADE_TYPE_SELL)
    }

    /// Monetary columns cut to two places, as served to clients.
    pub fn with_rounded_figures(mut self) -> Self {
        self.buy_price = round_opt_f64(self.buy_price);
        self.sell_price = round_opt_f64(self.sell_price);
        self.tradevalue = round_opt_f64(self.tradevalue);
        self.market_value = round_opt_f64(self.market_value);
        self.total_pnl = round_opt_f64(self.total_pnl);
        self.pct_pnl = round_opt_f64(self.pct_pnl);
        self.tvm = round_opt_f64(self.tvm);
        self
    }
}

/// Columns of a ledger row before the store assigns an id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTrade {
    pub ticker: Option<String>,
    pub symbol: String,
    pub sector: Option<String>,
    pub buy_date: Option<NaiveDate>,
    pub sell_date: Option<NaiveDate>,
    pub buy_price: Option<f64>,
    pub sell_price: Option<f64>,
    pub qty: i64,
    pub trade_type: Option<String>,
    pub note: Option<String>,
    pub strategy: Option<String>,
    pub tradevalue: Option<f64>,
    pub market_value: Option<f64>,
    pub total_pnl: Option<f64>,
    pub pct_pnl: Option<f64>,
    pub tvm: Option<f64>,
    pub pos_age: Option<String>,
}

/// A manual entry from the trade form, also used for simulations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeInput {
    pub symbol: String,
    #[serde(default)]
    pub ticker: Option<String>,
    pub buy_price: f64,
    pub qty: i64,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub buy_date: Option<NaiveDate>,
    #[serde(default)]
    pub sell_date: Option<NaiveDate>,
    #[serde(default)]
    pub sell_price: Option<f64>,
    #[serde(default, rename = "type")]
    pub trade_type: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub strategy: Option<String>,
}

impl TradeInput {
    /// Checks the symbol and numeric fields and returns the stored symbol.
    pub fn validate(&self) -> Result<String> {
        let symbol = validate_symbol(&self.symbol)?;
        require_finite("buy_price", self.buy_price)?;
        if let Some(price) = self.sell_price {
            require_finite("sell_price", price)?;
        }
        Ok(symbol)
    }

    /// Ledger columns for this entry; prices rounded to two places.
    pub fn into_new_trade(self) -> Result<NewTrade> {
        let symbol = self.validate()?;
        Ok(NewTrade {
            ticker: self.ticker,
            symbol,
            sector: self.sector,
            buy_date: self.buy_date,
            sell_date: self.sell_date,
            buy_price: Some(round_f64(self.buy_price)),
            sell_price: round_opt_f64(self.sell_price),
            qty: self.qty,
            trade_type: self.trade_type,
            note: self.note,
            strategy: self.strategy,
            ..NewTrade::default()
        })
    }
}

/// A sell of an open (spreadsheet) position, with its realised figures.
///
/// The figures are recorded as supplied; the ledger does not recompute them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SellTradeRecord {
    pub symbol: String,
    #[serde(default)]
    pub ticker: Option<String>,
    pub buy_date: NaiveDate,
    pub buy_price: f64,
    pub qty: i64,
    pub sell_date: NaiveDate,
    pub sell_price: f64,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default = "default_sell_note")]
    pub note: Option<String>,
    #[serde(default)]
    pub tradevalue: Option<f64>,
    #[serde(default)]
    pub market_value: Option<f64>,
    #[serde(default)]
    pub total_pnl: Option<f64>,
    #[serde(default)]
    pub pct_pnl: Option<f64>,
    #[serde(default)]
    pub tvm: Option<f64>,
    #[serde(default)]
    pub pos_age: Option<String>,
}

fn default_sell_note() -> Option<String> {
    Some(DEFAULT_SELL_NOTE.to_string())
}

impl SellTradeRecord {
    /// Closed ledger row: quantity zero, type `SELL`.
    pub fn into_new_trade(self) -> Result<NewTrade> {
        let symbol = validate_symbol(&self.symbol)?;
        require_finite("buy_price", self.buy_price)?;
        require_finite("sell_price", self.sell_price)?;
        if self.qty <= 0 {
            return Err(ValidationError::InvalidInput(format!(
                "qty must be greater than zero, got {}",
                self.qty
            ))
            .into());
        }
        Ok(NewTrade {
            ticker: self.ticker,
            symbol,
            sector: self.sector,
            buy_date: Some(self.buy_date),
            sell_date: Some(self.sell_date),
            buy_price: Some(round_f64(self.buy_price)),
            sell_price: Some(round_f64(self.sell_price)),
            qty: 0,
            trade_type: Some(TRADE_TYPE_SELL.to_string()),
            note: self.note,
            strategy: None,
            tradevalue: round_opt_f64(self.tradevalue),
            market_value: round_opt_f64(self.market_value),
            total_pnl: round_opt_f64(self.total_pnl),
            pct_pnl: round_opt_f64(self.pct_pnl),
            tvm: round_opt_f64(self.tvm),
            pos_age: self.pos_age,
        })
    }
}

/// Blended position after a hypothetical additional buy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SimulationResult {
    pub simulated_avg_price: f64,
    pub simulated_qty: i64,
}

/// Trims, checks and upper-cases a ticker symbol.
fn validate_symbol(raw: &str) -> Result<String> {
    let symbol = raw.trim();
    if symbol.is_empty() {
        return Err(ValidationError::MissingField("symbol".to_string()).into());
    }
    if !SYMBOL_PATTERN.is_match(symbol) {
        return Err(ValidationError::InvalidInput(format!(
            "symbol '{}' must be letters and digits only",
            symbol
        ))
        .into());
    }
    Ok(symbol.to_uppercase())
}

fn require_finite(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::InvalidInput(format!("{} must be a finite number", field)).into())
    }
}
