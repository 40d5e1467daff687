//! Pure aggregation of position lots.

use log::warn;
use rust_decimal::Decimal;
use std::collections::HashMap;

use super::positions_model::{
    AggregatedPosition, PortfolioTotals, PositionLot, PositionSort, PositionSortKey, SortOrder,
};

/// Running per-symbol state. `seed` is the first contributing lot.
struct Accumulator<'a> {
    seed: &'a PositionLot,
    total_qty: Decimal,
    total_cost: Decimal,
}

/// Groups open lots by normalized symbol into one row per security.
///
/// Lots with a blank symbol or a quantity of zero or less never contribute.
/// The first contributing lot of a symbol seeds its descriptive fields; later
/// lots only add quantity and cost. A lot whose figures overflow is logged and
/// skipped, and so is a symbol whose summary overflows.
pub fn aggregate_positions(lots: &[PositionLot]) -> Vec<AggregatedPosition> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Accumulator<'_>> = HashMap::new();

    for lot in lots {
        let symbol = lot.normalized_symbol();
        if symbol.is_empty() || lot.qty <= Decimal::ZERO {
            continue;
        }
        let Some(lot_cost) = lot.qty.checked_mul(lot.avg_price) else {
            warn!("Skipping {} lot: cost of {} x {} overflows", symbol, lot.qty, lot.avg_price);
            continue;
        };
        match groups.get_mut(&symbol) {
            Some(acc) => match (
                acc.total_qty.checked_add(lot.qty),
                acc.total_cost.checked_add(lot_cost),
            ) {
                (Some(total_qty), Some(total_cost)) => {
                    acc.total_qty = total_qty;
                    acc.total_cost = total_cost;
                }
                _ => warn!("Skipping {} lot: running totals overflow", symbol),
            },
            None => {
                order.push(symbol.clone());
                groups.insert(
                    symbol,
                    Accumulator {
                        seed: lot,
                        total_qty: lot.qty,
                        total_cost: lot_cost,
                    },
                );
            }
        }
    }

    order
        .into_iter()
        .filter_map(|symbol| {
            let acc = groups.remove(&symbol)?;
            let position = summarise(&symbol, acc);
            if position.is_none() {
                warn!("Dropping position {}: figures overflow", symbol);
            }
            position
        })
        .collect()
}

fn summarise(symbol: &str, acc: Accumulator<'_>) -> Option<AggregatedPosition> {
    let seed = acc.seed;
    let avg_price = acc.total_cost.checked_div(acc.total_qty)?;
    let market_value = seed.current_price.checked_mul(acc.total_qty)?;
    let pnl = market_value.checked_sub(acc.total_cost)?;
    let pct_pnl = if acc.total_cost.is_zero() {
        Decimal::ZERO
    } else {
        pnl.checked_div(acc.total_cost)?
            .checked_mul(Decimal::ONE_HUNDRED)?
    };

    Some(AggregatedPosition {
        symbol: symbol.to_string(),
        ticker: seed.ticker.clone(),
        sector: seed.sector.clone(),
        account: seed.account.clone(),
        pos_age: seed.pos_age.clone(),
        first_buy_date: seed.buy_date,
        total_qty: acc.total_qty,
        total_cost: acc.total_cost,
        avg_price,
        current_price: seed.current_price,
        market_value,
        pnl,
        pct_pnl,
        daily_change: seed.daily_change,
        daily_pnl: seed.daily_pnl,
        tvm: seed.tvm,
        sheet_tradevalue: seed.tradevalue,
        sheet_market_value: seed.market_value,
        sheet_total_pnl: seed.total_pnl,
        sheet_pct_pnl: seed.pct_pnl,
    })
}

/// Orders positions for presentation. Ties keep their aggregation order.
pub fn sort_positions(positions: &mut [AggregatedPosition], sort: PositionSort) {
    positions.sort_by(|a, b| {
        let ordering = match sort.key {
            PositionSortKey::DailyChange => a.daily_change.cmp(&b.daily_change),
            PositionSortKey::Symbol => a.symbol.cmp(&b.symbol),
            PositionSortKey::MarketValue => a.market_value.cmp(&b.market_value),
            PositionSortKey::Pnl => a.pnl.cmp(&b.pnl),
            PositionSortKey::PctPnl => a.pct_pnl.cmp(&b.pct_pnl),
        };
        match sort.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// Sums the sheet's figures over every lot as read, open or not.
///
/// Unlike [`aggregate_positions`], closed and invalid lots are included; the
/// portfolio index history is defined over these totals. A lot that would
/// overflow the sums is logged and left out.
pub fn portfolio_totals(lots: &[PositionLot]) -> PortfolioTotals {
    let mut totals = PortfolioTotals::default();
    for lot in lots {
        let next = (
            totals.current_market_value.checked_add(lot.market_value),
            totals.total_cost_value.checked_add(lot.tradevalue),
            totals.daily_pnl_sum.checked_add(lot.daily_pnl),
        );
        let (Some(market), Some(cost), Some(daily)) = next else {
            warn!("Leaving {} out of portfolio totals: sums overflow", lot.symbol);
            continue;
        };
        let Some(pnl) = market.checked_sub(cost) else {
            warn!("Leaving {} out of portfolio totals: P&L overflows", lot.symbol);
            continue;
        };
        totals.lot_count += 1;
        totals.current_market_value = market;
        totals.total_cost_value = cost;
        totals.daily_pnl_sum = daily;
        totals.total_pnl = pnl;
    }
    totals
}
