//! Tests for the trade ledger service using an in-memory repository.

use super::*;
use crate::errors::{DatabaseError, Error, Result, ValidationError};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockTradeRepository {
    rows: Mutex<Vec<Trade>>,
}

impl MockTradeRepository {
    fn with_rows(rows: Vec<Trade>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    fn stored(&self) -> Vec<Trade> {
        self.rows.lock().unwrap().clone()
    }
}

fn to_trade(id: i32, t: NewTrade) -> Trade {
    Trade {
        id,
        ticker: t.ticker,
        symbol: t.symbol,
        sector: t.sector,
        buy_date: t.buy_date,
        sell_date: t.sell_date,
        buy_price: t.buy_price,
        sell_price: t.sell_price,
        qty: t.qty,
        trade_type: t.trade_type,
        note: t.note,
        strategy: t.strategy,
        tradevalue: t.tradevalue,
        market_value: t.market_value,
        total_pnl: t.total_pnl,
        pct_pnl: t.pct_pnl,
        tvm: t.tvm,
        pos_age: t.pos_age,
    }
}

#[async_trait]
impl TradeRepositoryTrait for MockTradeRepository {
    async fn insert_trade(&self, new_trade: NewTrade) -> Result<Trade> {
        let mut rows = self.rows.lock().unwrap();
        let trade = to_trade(rows.len() as i32 + 1, new_trade);
        rows.push(trade.clone());
        Ok(trade)
    }

    async fn update_trade(&self, id: i32, changes: NewTrade) -> Result<Trade> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| DatabaseError::NotFound(format!("trade {}", id)))?;
        let realised = (row.tradevalue, row.market_value, row.total_pnl);
        *row = to_trade(id, changes);
        (row.tradevalue, row.market_value, row.total_pnl) = realised;
        Ok(row.clone())
    }

    fn list_realised(&self) -> Result<Vec<Trade>> {
        let mut rows: Vec<Trade> = self.stored().into_iter().filter(Trade::is_realised).collect();
        rows.sort_by(|a, b| b.sell_date.cmp(&a.sell_date));
        Ok(rows)
    }

    fn list_all(&self) -> Result<Vec<Trade>> {
        let mut rows = self.stored();
        rows.sort_by_key(|t| (t.buy_date, t.id));
        Ok(rows)
    }

    fn list_open_lots(&self, symbol: &str) -> Result<Vec<Trade>> {
        Ok(self
            .stored()
            .into_iter()
            .filter(|t| t.symbol == symbol && t.sell_date.is_none() && t.qty > 0)
            .collect())
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn entry(symbol: &str, qty: i64, buy_price: f64) -> TradeInput {
    TradeInput {
        symbol: symbol.to_string(),
        ticker: None,
        buy_price,
        qty,
        sector: None,
        buy_date: None,
        sell_date: None,
        sell_price: None,
        trade_type: None,
        note: None,
        strategy: None,
    }
}

fn sell(symbol: &str, sell_day: NaiveDate) -> SellTradeRecord {
    SellTradeRecord {
        symbol: symbol.to_string(),
        ticker: Some(format!("{}.NS", symbol)),
        buy_date: date(2023, 1, 2),
        buy_price: 100.456,
        qty: 10,
        sell_date: sell_day,
        sell_price: 150.0,
        sector: None,
        note: Some("Sold".to_string()),
        tradevalue: Some(1004.564),
        market_value: Some(1500.0),
        total_pnl: Some(495.436),
        pct_pnl: Some(49.3187),
        tvm: None,
        pos_age: Some("1y".to_string()),
    }
}

fn service(repo: Arc<MockTradeRepository>) -> TradeService {
    TradeService::new(repo)
}

#[tokio::test]
async fn test_create_trade_normalizes_symbol_and_rounds_prices() {
    let repo = Arc::new(MockTradeRepository::default());
    let svc = service(repo.clone());

    let mut input = entry("  infy ", 5, 1450.567);
    input.sell_price = Some(1500.004);
    let trade = svc.create_trade(input).await.unwrap();

    assert_eq!(trade.id, 1);
    assert_eq!(trade.symbol, "INFY");
    assert_eq!(trade.buy_price, Some(1450.57));
    assert_eq!(trade.sell_price, Some(1500.0));
    assert_eq!(repo.stored().len(), 1);
}

#[tokio::test]
async fn test_create_trade_rejects_bad_symbols() {
    let repo = Arc::new(MockTradeRepository::default());
    let svc = service(repo.clone());

    let err = svc.create_trade(entry("M&M", 1, 10.0)).await.unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::InvalidInput(_))));

    let err = svc.create_trade(entry("   ", 1, 10.0)).await.unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::MissingField(_))));

    assert!(repo.stored().is_empty());
}

#[tokio::test]
async fn test_update_missing_trade_is_not_found() {
    let svc = service(Arc::new(MockTradeRepository::default()));

    let err = svc.update_trade(42, entry("TCS", 1, 10.0)).await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_update_rewrites_entry_fields() {
    let repo = Arc::new(MockTradeRepository::default());
    let svc = service(repo.clone());
    let created = svc.create_trade(entry("TCS", 1, 10.0)).await.unwrap();

    let mut changes = entry("tcs", 3, 12.346);
    changes.strategy = Some("swing".to_string());
    let updated = svc.update_trade(created.id, changes).await.unwrap();

    assert_eq!(updated.qty, 3);
    assert_eq!(updated.buy_price, Some(12.35));
    assert_eq!(updated.strategy.as_deref(), Some("swing"));
}

#[tokio::test]
async fn test_record_sell_stores_a_closed_row() {
    let repo = Arc::new(MockTradeRepository::default());
    let svc = service(repo.clone());

    let trade = svc.record_sell(sell("hdfc", date(2024, 3, 1))).await.unwrap();

    assert_eq!(trade.qty, 0);
    assert_eq!(trade.trade_type.as_deref(), Some("SELL"));
    assert_eq!(trade.buy_price, Some(100.46));
    assert_eq!(trade.tradevalue, Some(1004.56));
    assert_eq!(trade.total_pnl, Some(495.44));
    assert_eq!(trade.pct_pnl, Some(49.32));
    assert!(trade.is_realised());
}

#[tokio::test]
async fn test_record_sell_requires_positive_quantity() {
    let svc = service(Arc::new(MockTradeRepository::default()));
    let mut record = sell("HDFC", date(2024, 3, 1));
    record.qty = 0;

    let err = svc.record_sell(record).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn test_sell_note_defaults_when_absent() {
    let record: SellTradeRecord = serde_json::from_str(
        r#"{"symbol":"ITC","buy_date":"2024-01-02","buy_price":400,"qty":5,
            "sell_date":"2024-02-02","sell_price":450}"#,
    )
    .unwrap();
    assert_eq!(
        record.note.as_deref(),
        Some("Sold from Open Positions (Excel Source)")
    );
}

#[tokio::test]
async fn test_realised_trades_newest_first() {
    let repo = Arc::new(MockTradeRepository::default());
    let svc = service(repo.clone());
    svc.record_sell(sell("A", date(2024, 1, 5))).await.unwrap();
    svc.record_sell(sell("B", date(2024, 6, 5))).await.unwrap();
    svc.create_trade(entry("C", 4, 10.0)).await.unwrap();

    let realised = svc.get_realised_trades().unwrap();

    let symbols: Vec<_> = realised.iter().map(|t| t.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["B", "A"]);
}

#[test]
fn test_simulation_blends_open_lots_only() {
    let mut closed = to_trade(
        3,
        NewTrade {
            symbol: "INFY".to_string(),
            qty: 50,
            buy_price: Some(1.0),
            sell_date: Some(date(2024, 1, 1)),
            ..NewTrade::default()
        },
    );
    closed.trade_type = Some("BUY".to_string());
    let repo = Arc::new(MockTradeRepository::with_rows(vec![
        to_trade(
            1,
            NewTrade {
                symbol: "INFY".to_string(),
                qty: 10,
                buy_price: Some(100.0),
                ..NewTrade::default()
            },
        ),
        to_trade(
            2,
            NewTrade {
                symbol: "TCS".to_string(),
                qty: 10,
                buy_price: Some(3000.0),
                ..NewTrade::default()
            },
        ),
        closed,
    ]));
    let svc = service(repo);

    let result = svc.simulate_buy(&entry("infy", 20, 130.0)).unwrap();

    assert_eq!(result.simulated_qty, 30);
    assert_eq!(result.simulated_avg_price, 120.0);
}

#[test]
fn test_simulation_with_zero_total_quantity() {
    let result = simulate_additional_buy(&[], 0, 99.0).unwrap();
    assert_eq!(
        result,
        SimulationResult {
            simulated_avg_price: 0.0,
            simulated_qty: 0
        }
    );
}

#[test]
fn test_simulation_rounds_average() {
    let lot = to_trade(
        1,
        NewTrade {
            symbol: "ITC".to_string(),
            qty: 3,
            buy_price: Some(100.0),
            ..NewTrade::default()
        },
    );
    let result = simulate_additional_buy(&[lot], 0, 0.0).unwrap();
    assert_eq!(result.simulated_avg_price, 100.0);

    let result = simulate_additional_buy(&[], 3, 10.0 / 3.0).unwrap();
    assert_eq!(result.simulated_avg_price, 3.33);
}

#[test]
fn test_simulation_rejects_quantity_overflow() {
    let lot = to_trade(
        1,
        NewTrade {
            symbol: "ITC".to_string(),
            qty: 3,
            buy_price: Some(100.0),
            ..NewTrade::default()
        },
    );

    let err = simulate_additional_buy(&[lot], i64::MAX, 1.0).unwrap_err();

    assert!(matches!(
        err,
        Error::Validation(ValidationError::InvalidInput(_))
    ));
}
