//! Database models for trades.

use chrono::NaiveDate;
use diesel::prelude::*;

use tradebook_core::constants::DATE_FORMAT;
use tradebook_core::trades::{NewTrade, Trade};

/// Database model for a ledger row
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::trades)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TradeDB {
    pub id: i32,
    pub ticker: Option<String>,
    pub symbol: String,
    pub sector: Option<String>,
    pub buy_date: Option<String>,
    pub sell_date: Option<String>,
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

/// Database model for inserting a ledger row
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::trades)]
pub struct NewTradeDB {
    pub ticker: Option<String>,
    pub symbol: String,
    pub sector: Option<String>,
    pub buy_date: Option<String>,
    pub sell_date: Option<String>,
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

/// The columns an entry update rewrites. Absent values clear the column.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::trades)]
#[diesel(treat_none_as_null = true)]
pub struct TradeEntryChangeset {
    pub ticker: Option<String>,
    pub symbol: String,
    pub sector: Option<String>,
    pub buy_date: Option<String>,
    pub sell_date: Option<String>,
    pub buy_price: Option<f64>,
    pub sell_price: Option<f64>,
    pub qty: i64,
    pub trade_type: Option<String>,
    pub note: Option<String>,
    pub strategy: Option<String>,
}

fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}

fn parse_date(raw: Option<String>) -> Option<NaiveDate> {
    let raw = raw?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .map_err(|e| log::warn!("Ignoring unparseable stored date '{}': {}", raw, e))
        .ok()
}

// Conversion to domain models
impl From<TradeDB> for Trade {
    fn from(db: TradeDB) -> Self {
        Self {
            id: db.id,
            ticker: db.ticker,
            symbol: db.symbol,
            sector: db.sector,
            buy_date: parse_date(db.buy_date),
            sell_date: parse_date(db.sell_date),
            buy_price: db.buy_price,
            sell_price: db.sell_price,
            qty: db.qty,
            trade_type: db.trade_type,
            note: db.note,
            strategy: db.strategy,
            tradevalue: db.tradevalue,
            market_value: db.market_value,
            total_pnl: db.total_pnl,
            pct_pnl: db.pct_pnl,
            tvm: db.tvm,
            pos_age: db.pos_age,
        }
    }
}

impl From<NewTrade> for NewTradeDB {
    fn from(domain: NewTrade) -> Self {
        Self {
            ticker: domain.ticker,
            symbol: domain.symbol,
            sector: domain.sector,
            buy_date: format_date(domain.buy_date),
            sell_date: format_date(domain.sell_date),
            buy_price: domain.buy_price,
            sell_price: domain.sell_price,
            qty: domain.qty,
            trade_type: domain.trade_type,
            note: domain.note,
            strategy: domain.strategy,
            tradevalue: domain.tradevalue,
            market_value: domain.market_value,
            total_pnl: domain.total_pnl,
            pct_pnl: domain.pct_pnl,
            tvm: domain.tvm,
            pos_age: domain.pos_age,
        }
    }
}

impl From<NewTrade> for TradeEntryChangeset {
    fn from(domain: NewTrade) -> Self {
        Self {
            ticker: domain.ticker,
            symbol: domain.symbol,
            sector: domain.sector,
            buy_date: format_date(domain.buy_date),
            sell_date: format_date(domain.sell_date),
            buy_price: domain.buy_price,
            sell_price: domain.sell_price,
            qty: domain.qty,
            trade_type: domain.trade_type,
            note: domain.note,
            strategy: domain.strategy,
        }
    }
}
