//! Database model for portfolio snapshots.

use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use tradebook_core::constants::{DATE_FORMAT, DISPLAY_DECIMAL_PRECISION};
use tradebook_core::portfolio::snapshot::PortfolioSnapshot;

/// Database model for a portfolio snapshot. Decimals are stored as text.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, PartialEq)]
#[diesel(table_name = crate::schema::portfolio_snapshots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioSnapshotDB {
    pub date: String,
    pub market_value: String,
    pub total_cost_value: String,
    pub total_pnl: String,
    pub daily_pnl_sum: String,
    pub portfolio_index_value: String,
    pub net_cash_flow_today: String,
    pub created_at: String,
}

fn parse_decimal(column: &str, raw: &str) -> Decimal {
    Decimal::from_str(raw).unwrap_or_else(|e| {
        log::error!("Failed to parse stored {} '{}': {}", column, raw, e);
        Decimal::ZERO
    })
}

fn format_decimal(value: Decimal) -> String {
    value.round_dp(DISPLAY_DECIMAL_PRECISION).to_string()
}

// Conversion from DB model to Domain model
impl From<PortfolioSnapshotDB> for PortfolioSnapshot {
    fn from(db: PortfolioSnapshotDB) -> Self {
        Self {
            date: NaiveDate::parse_from_str(&db.date, DATE_FORMAT).unwrap_or_default(),
            market_value: parse_decimal("market_value", &db.market_value),
            total_cost_value: parse_decimal("total_cost_value", &db.total_cost_value),
            total_pnl: parse_decimal("total_pnl", &db.total_pnl),
            daily_pnl_sum: parse_decimal("daily_pnl_sum", &db.daily_pnl_sum),
            portfolio_index_value: parse_decimal(
                "portfolio_index_value",
                &db.portfolio_index_value,
            ),
            net_cash_flow_today: parse_decimal("net_cash_flow_today", &db.net_cash_flow_today),
        }
    }
}

// Conversion from Domain model to DB model
impl From<PortfolioSnapshot> for PortfolioSnapshotDB {
    fn from(domain: PortfolioSnapshot) -> Self {
        Self {
            date: domain.date.format(DATE_FORMAT).to_string(),
            market_value: format_decimal(domain.market_value),
            total_cost_value: format_decimal(domain.total_cost_value),
            total_pnl: format_decimal(domain.total_pnl),
            daily_pnl_sum: format_decimal(domain.daily_pnl_sum),
            portfolio_index_value: format_decimal(domain.portfolio_index_value),
            net_cash_flow_today: format_decimal(domain.net_cash_flow_today),
            created_at: Utc::now().format("%Y-%m-%dT%H:%M:%S%.fZ").to_string(),
        }
    }
}
