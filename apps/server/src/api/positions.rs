use std::sync::Arc;

use super::ReloadResponse;
use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tradebook_core::{
    positions::{AggregatedPosition, PositionSort, PositionSortKey, SortOrder},
    trades::TradeInput,
    utils::money::serialize_money,
};

#[derive(Deserialize)]
struct PositionsQuery {
    sort: Option<PositionSortKey>,
    order: Option<SortOrder>,
}

/// One open position as served to the dashboard.
#[derive(Serialize)]
struct PositionResponse {
    symbol: String,
    ticker: String,
    #[serde(rename = "avgPrice", serialize_with = "serialize_money")]
    avg_price: Decimal,
    #[serde(rename = "totalQty", serialize_with = "serialize_money")]
    total_qty: Decimal,
    #[serde(rename = "costValue", serialize_with = "serialize_money")]
    cost_value: Decimal,
    #[serde(rename = "currentPrice", serialize_with = "serialize_money")]
    current_price: Decimal,
    #[serde(rename = "marketValue", serialize_with = "serialize_money")]
    market_value: Decimal,
    #[serde(serialize_with = "serialize_money")]
    pnl: Decimal,
    #[serde(serialize_with = "serialize_money")]
    pct_pnl: Decimal,
    sector: String,
    #[serde(serialize_with = "serialize_money")]
    daily_change: Decimal,
    #[serde(serialize_with = "serialize_money")]
    daily_pnl: Decimal,
    #[serde(serialize_with = "serialize_money")]
    tradevalue: Decimal,
    #[serde(serialize_with = "serialize_money")]
    total_pnl: Decimal,
    pos_age: String,
    account: String,
    #[serde(serialize_with = "serialize_money")]
    tvm: Decimal,
    fallback: bool,
    original_buy_date: Option<NaiveDate>,
    #[serde(serialize_with = "serialize_money")]
    original_buy_price: Decimal,
    #[serde(serialize_with = "serialize_money")]
    excel_tradevalue: Decimal,
    #[serde(serialize_with = "serialize_money")]
    excel_market_value: Decimal,
    #[serde(serialize_with = "serialize_money")]
    excel_total_pnl: Decimal,
    #[serde(serialize_with = "serialize_money")]
    excel_pct_pnl: Decimal,
    #[serde(serialize_with = "serialize_money")]
    excel_tvm: Decimal,
    excel_pos_age: String,
}

impl From<AggregatedPosition> for PositionResponse {
    fn from(p: AggregatedPosition) -> Self {
        Self {
            symbol: p.symbol,
            ticker: p.ticker,
            avg_price: p.avg_price,
            total_qty: p.total_qty,
            cost_value: p.total_cost,
            current_price: p.current_price,
            market_value: p.market_value,
            pnl: p.pnl,
            pct_pnl: p.pct_pnl,
            sector: p.sector,
            daily_change: p.daily_change,
            daily_pnl: p.daily_pnl,
            tradevalue: p.sheet_tradevalue,
            total_pnl: p.sheet_total_pnl,
            excel_pos_age: p.pos_age.clone(),
            pos_age: p.pos_age,
            account: p.account,
            tvm: p.tvm,
            fallback: false,
            original_buy_date: p.first_buy_date,
            original_buy_price: p.avg_price,
            excel_tradevalue: p.sheet_tradevalue,
            excel_market_value: p.sheet_market_value,
            excel_total_pnl: p.sheet_total_pnl,
            excel_pct_pnl: p.sheet_pct_pnl,
            excel_tvm: p.tvm,
        }
    }
}

async fn get_positions(
    State(state): State<Arc<AppState>>,
    Query(q): Query<PositionsQuery>,
) -> ApiResult<Json<Vec<PositionResponse>>> {
    let sort = PositionSort {
        key: q.sort.unwrap_or_default(),
        order: q.order.unwrap_or_default(),
    };
    let positions = state.position_service.get_open_positions(sort)?;
    Ok(Json(positions.into_iter().map(PositionResponse::from).collect()))
}

async fn create_position(
    State(state): State<Arc<AppState>>,
    Json(input): Json<TradeInput>,
) -> ApiResult<Json<Value>> {
    let trade = state.trade_service.create_trade(input).await?;
    Ok(Json(json!({ "status": "success", "id": trade.id })))
}

async fn update_position(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(input): Json<TradeInput>,
) -> ApiResult<Json<Value>> {
    state.trade_service.update_trade(id, input).await?;
    Ok(Json(json!({ "status": "updated" })))
}

async fn reload_positions(State(state): State<Arc<AppState>>) -> ApiResult<Json<ReloadResponse>> {
    let summary = state.position_service.reload()?;
    Ok(Json(ReloadResponse::new(
        "Excel data reloaded successfully",
        summary,
    )))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/positions", get(get_positions).post(create_position))
        .route("/positions/{id}", put(update_position))
        .route("/reload-excel-data", post(reload_positions))
}
