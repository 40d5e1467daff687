use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use rust_decimal::{prelude::FromPrimitive, Decimal};
use serde::Deserialize;
use tradebook_core::{
    portfolio::snapshot::{LiveIndex, PortfolioSnapshot, SnapshotOutcome},
    utils::time_utils::valuation_date_today,
};

#[derive(Deserialize, Default)]
struct SnapshotRequest {
    #[serde(default)]
    net_cash_flow_today: Option<f64>,
}

#[derive(Deserialize)]
struct LiveIndexQuery {
    net_cash_flow_today: Option<f64>,
}

/// Today's net cash flow; absent means none.
fn cash_flow(raw: Option<f64>) -> ApiResult<Decimal> {
    match raw {
        None => Ok(Decimal::ZERO),
        Some(value) => Decimal::from_f64(value).ok_or_else(|| {
            ApiError::BadRequest(format!(
                "net_cash_flow_today must be a finite number, got {}",
                value
            ))
        }),
    }
}

async fn take_snapshot(
    State(state): State<Arc<AppState>>,
    body: Option<Json<SnapshotRequest>>,
) -> ApiResult<Json<SnapshotOutcome>> {
    let request = body.map(|Json(inner)| inner).unwrap_or_default();
    let net_cash_flow = cash_flow(request.net_cash_flow_today)?;
    let today = valuation_date_today(state.timezone);
    let outcome = state
        .snapshot_service
        .take_snapshot(net_cash_flow, today)
        .await?;
    Ok(Json(outcome))
}

async fn get_portfolio_history(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<PortfolioSnapshot>>> {
    let history = state.snapshot_service.get_history()?;
    Ok(Json(history))
}

async fn calculate_live_index(
    State(state): State<Arc<AppState>>,
    Query(q): Query<LiveIndexQuery>,
) -> ApiResult<Json<LiveIndex>> {
    let net_cash_flow = cash_flow(q.net_cash_flow_today)?;
    let today = valuation_date_today(state.timezone);
    let live = state
        .snapshot_service
        .calculate_live_index(net_cash_flow, today)?;
    Ok(Json(live))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/snapshot", post(take_snapshot))
        .route("/portfolio-history", get(get_portfolio_history))
        .route("/calculate-live-index", get(calculate_live_index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cash_flow_defaults_to_zero() {
        assert_eq!(cash_flow(None).unwrap(), Decimal::ZERO);
        assert_eq!(cash_flow(Some(-250.5)).unwrap(), dec!(-250.5));
    }

    #[test]
    fn test_cash_flow_rejects_non_finite_values() {
        assert!(matches!(
            cash_flow(Some(f64::NAN)),
            Err(ApiError::BadRequest(_))
        ));
        assert!(cash_flow(Some(f64::INFINITY)).is_err());
    }
}
