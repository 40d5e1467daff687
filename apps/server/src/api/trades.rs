use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tradebook_core::trades::{SellTradeRecord, SimulationResult, Trade, TradeInput};

async fn record_sell(
    State(state): State<Arc<AppState>>,
    Json(record): Json<SellTradeRecord>,
) -> ApiResult<Json<Value>> {
    let trade = state.trade_service.record_sell(record).await?;
    Ok(Json(json!({
        "status": "sell trade recorded successfully",
        "id": trade.id,
    })))
}

async fn simulate(
    State(state): State<Arc<AppState>>,
    Json(input): Json<TradeInput>,
) -> ApiResult<Json<SimulationResult>> {
    let result = state.trade_service.simulate_buy(&input)?;
    Ok(Json(result))
}

async fn get_realised(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Trade>>> {
    let trades = state.trade_service.get_realised_trades()?;
    Ok(Json(trades))
}

async fn get_all_trades(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Trade>>> {
    let trades = state.trade_service.get_all_trades()?;
    Ok(Json(trades))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sell_trade", post(record_sell))
        .route("/simulate", post(simulate))
        .route("/realised", get(get_realised))
        .route("/trades", get(get_all_trades))
        .route("/all_trades", get(get_all_trades))
}
