//! Unit tests for position aggregation and the position service.

use super::*;
use crate::errors::{DataSourceError, Error, Result};
use crate::tabular::{CellValue, RawRow, TabularSourceTrait};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

fn lot(symbol: &str, qty: Decimal, avg_price: Decimal, current_price: Decimal) -> PositionLot {
    PositionLot {
        symbol: symbol.to_string(),
        qty,
        avg_price,
        current_price,
        ..PositionLot::default()
    }
}

// ==================== aggregate_positions ====================

#[test]
fn test_average_price_is_quantity_weighted() {
    let lots = vec![
        lot("INFY", dec!(10), dec!(100), dec!(120)),
        lot("INFY", dec!(30), dec!(140), dec!(999)),
    ];

    let positions = aggregate_positions(&lots);

    assert_eq!(positions.len(), 1);
    let infy = &positions[0];
    assert_eq!(infy.total_qty, dec!(40));
    assert_eq!(infy.total_cost, dec!(5200));
    assert_eq!(infy.avg_price, dec!(130));
    // Current price comes from the first lot seen
    assert_eq!(infy.current_price, dec!(120));
    assert_eq!(infy.market_value, dec!(4800));
    assert_eq!(infy.pnl, dec!(-400));
}

#[test]
fn test_non_positive_lots_never_affect_a_symbol() {
    let with_closed = vec![
        lot("TCS", dec!(5), dec!(3000), dec!(3100)),
        lot("TCS", dec!(0), dec!(1), dec!(1)),
        lot("TCS", dec!(-4), dec!(10), dec!(10)),
    ];
    let only_open = vec![lot("TCS", dec!(5), dec!(3000), dec!(3100))];

    assert_eq!(
        aggregate_positions(&with_closed),
        aggregate_positions(&only_open)
    );
}

#[test]
fn test_closed_lot_does_not_seed_descriptive_fields() {
    let mut closed = lot("HDFC", dec!(0), dec!(1), dec!(1));
    closed.sector = "Closed Sector".to_string();
    let mut open = lot("HDFC", dec!(2), dec!(1500), dec!(1600));
    open.sector = "Banking".to_string();

    let positions = aggregate_positions(&[closed, open]);

    assert_eq!(positions[0].sector, "Banking");
}

#[test]
fn test_symbol_grouping_is_case_insensitive_and_trimmed() {
    let mut first = lot("infy", dec!(1), dec!(10), dec!(11));
    first.sector = "IT".to_string();
    first.account = "Main".to_string();
    first.ticker = "INFY.NS".to_string();
    first.buy_date = NaiveDate::from_ymd_opt(2023, 1, 2);
    let mut second = lot(" INFY ", dec!(1), dec!(20), dec!(50));
    second.sector = "Other".to_string();
    second.account = "Other".to_string();

    let positions = aggregate_positions(&[first, second]);

    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0].symbol, "INFY");
    assert_eq!(positions[0].sector, "IT");
    assert_eq!(positions[0].account, "Main");
    assert_eq!(positions[0].ticker, "INFY.NS");
    assert_eq!(positions[0].first_buy_date, NaiveDate::from_ymd_opt(2023, 1, 2));
    assert_eq!(positions[0].avg_price, dec!(15));
}

#[test]
fn test_pct_pnl_is_zero_when_cost_is_zero() {
    let positions = aggregate_positions(&[lot("BONUS", dec!(10), dec!(0), dec!(25))]);

    assert_eq!(positions[0].total_cost, Decimal::ZERO);
    assert_eq!(positions[0].pnl, dec!(250));
    assert_eq!(positions[0].pct_pnl, Decimal::ZERO);
}

#[test]
fn test_pct_pnl_uses_cost_basis() {
    let positions = aggregate_positions(&[lot("ITC", dec!(4), dec!(250), dec!(275))]);
    assert_eq!(positions[0].pct_pnl, dec!(10));
}

#[test]
fn test_blank_symbols_are_ignored() {
    let positions = aggregate_positions(&[lot("  ", dec!(3), dec!(10), dec!(10))]);
    assert!(positions.is_empty());
}

// ==================== sort_positions ====================

#[test]
fn test_default_sort_is_daily_change_descending() {
    let mut a = lot("A", dec!(1), dec!(1), dec!(1));
    a.daily_change = dec!(-1.5);
    let mut b = lot("B", dec!(1), dec!(1), dec!(1));
    b.daily_change = dec!(2.5);
    let mut c = lot("C", dec!(1), dec!(1), dec!(1));
    c.daily_change = dec!(0.3);

    let mut positions = aggregate_positions(&[a, b, c]);
    sort_positions(&mut positions, PositionSort::default());

    let symbols: Vec<_> = positions.iter().map(|p| p.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["B", "C", "A"]);
}

#[test]
fn test_sort_by_symbol_ascending() {
    let mut positions = aggregate_positions(&[
        lot("ZEEL", dec!(1), dec!(1), dec!(1)),
        lot("ACC", dec!(1), dec!(1), dec!(1)),
    ]);
    sort_positions(
        &mut positions,
        PositionSort {
            key: PositionSortKey::Symbol,
            order: SortOrder::Asc,
        },
    );
    assert_eq!(positions[0].symbol, "ACC");
}

// ==================== portfolio_totals ====================

#[test]
fn test_totals_include_every_lot_as_read() {
    let mut open = lot("A", dec!(10), dec!(10), dec!(12));
    open.market_value = dec!(120);
    open.tradevalue = dec!(100);
    open.daily_pnl = dec!(5);
    let mut closed = lot("B", dec!(0), dec!(0), dec!(0));
    closed.market_value = dec!(30);
    closed.tradevalue = dec!(40);
    closed.daily_pnl = dec!(-2);

    let totals = portfolio_totals(&[open, closed]);

    assert_eq!(totals.lot_count, 2);
    assert_eq!(totals.current_market_value, dec!(150));
    assert_eq!(totals.total_cost_value, dec!(140));
    assert_eq!(totals.total_pnl, dec!(10));
    assert_eq!(totals.daily_pnl_sum, dec!(3));
}

#[test]
fn test_totals_leave_out_a_lot_that_overflows_the_sums() {
    let mut first = lot("A", dec!(1), dec!(1), dec!(1));
    first.market_value = Decimal::MAX;
    let mut second = lot("B", dec!(1), dec!(1), dec!(1));
    second.market_value = Decimal::MAX;
    second.tradevalue = dec!(7);

    let totals = portfolio_totals(&[first, second]);

    assert_eq!(totals.lot_count, 1);
    assert_eq!(totals.current_market_value, Decimal::MAX);
    assert_eq!(totals.total_cost_value, Decimal::ZERO);
}

// ==================== PositionService ====================

struct MockSheet {
    rows: Option<Vec<RawRow>>,
}

impl TabularSourceTrait for MockSheet {
    fn describe(&self) -> String {
        "positions.xlsx".to_string()
    }

    fn read_rows(&self) -> Result<Vec<RawRow>> {
        self.rows
            .clone()
            .ok_or_else(|| Error::DataSource(DataSourceError::NotFound("positions.xlsx".into())))
    }
}

fn sheet_row(line: usize, symbol: &str, qty: &str, avg_price: &str, market_value: &str) -> RawRow {
    RawRow::new(line)
        .with_cell("Symbol", CellValue::Text(symbol.to_string()))
        .with_cell("Qty", CellValue::Text(qty.to_string()))
        .with_cell("Avg_Price", CellValue::Text(avg_price.to_string()))
        .with_cell("Current_Price", CellValue::Number(110.0))
        .with_cell("Market_Value", CellValue::Text(market_value.to_string()))
}

#[test]
fn test_service_reads_sheet_and_aggregates() {
    let service = PositionService::new(Arc::new(MockSheet {
        rows: Some(vec![
            sheet_row(1, "infy", "10", "₹100.00", "1,100"),
            sheet_row(2, "INFY", "10", "₹120.00", "1,100"),
            sheet_row(3, "TCS", "0", "3000", "0"),
        ]),
    }));

    let positions = service.get_open_positions(PositionSort::default()).unwrap();
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0].avg_price, dec!(110));

    let totals = service.get_portfolio_totals().unwrap();
    assert_eq!(totals.lot_count, 3);
    assert_eq!(totals.current_market_value, dec!(2200));
}

#[test]
fn test_service_surfaces_missing_sheet() {
    let service = PositionService::new(Arc::new(MockSheet { rows: None }));

    let err = service
        .get_open_positions(PositionSort::default())
        .unwrap_err();
    assert!(matches!(err, Error::DataSource(_)));
}

#[test]
fn test_lot_with_overflowing_number_is_skipped() {
    let service = PositionService::new(Arc::new(MockSheet {
        rows: Some(vec![
            sheet_row(1, "INFY", "10", "100", "1000"),
            sheet_row(2, "TCS", "1", "1e400", "10"),
        ]),
    }));

    let summary = service.reload().unwrap();
    assert_eq!(summary.records, 1);
    assert_eq!(summary.skipped_rows, 1);
}

#[test]
fn test_lot_with_overflowing_cost_is_left_out_of_positions() {
    let service = PositionService::new(Arc::new(MockSheet {
        rows: Some(vec![
            sheet_row(1, "INFY", "10", "100", "1000"),
            sheet_row(2, "TCS", "1000000000000000", "1000000000000000", "10"),
        ]),
    }));

    let positions = service.get_open_positions(PositionSort::default()).unwrap();

    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0].symbol, "INFY");
    assert_eq!(positions[0].total_cost, dec!(1000));
}

#[test]
fn test_overflowing_running_totals_keep_the_earlier_lots() {
    let lots = vec![
        lot("HUGE", Decimal::MAX, dec!(0), dec!(0)),
        lot("HUGE", Decimal::MAX, dec!(0), dec!(0)),
        lot("ITC", dec!(4), dec!(250), dec!(275)),
    ];

    let positions = aggregate_positions(&lots);

    assert_eq!(positions.len(), 2);
    assert_eq!(positions[0].symbol, "HUGE");
    assert_eq!(positions[0].total_qty, Decimal::MAX);
    assert_eq!(positions[1].symbol, "ITC");
}
