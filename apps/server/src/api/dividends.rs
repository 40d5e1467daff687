use std::sync::Arc;

use super::ReloadResponse;
use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tradebook_core::dividends::DividendSummary;

async fn get_dividends(State(state): State<Arc<AppState>>) -> ApiResult<Json<DividendSummary>> {
    let summary = state.dividend_service.get_summary()?;
    Ok(Json(summary))
}

async fn reload_dividends(State(state): State<Arc<AppState>>) -> ApiResult<Json<ReloadResponse>> {
    let summary = state.dividend_service.reload()?;
    Ok(Json(ReloadResponse::new(
        "Dividend data reloaded successfully",
        summary,
    )))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dividends", get(get_dividends))
        .route("/reload-dividends-data", post(reload_dividends))
}
