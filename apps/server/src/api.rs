use std::sync::Arc;

use axum::{http::HeaderValue, routing::get, Router};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{config::Config, main_lib::AppState};
use tradebook_core::tabular::ReloadSummary;

mod dividends;
mod portfolio;
mod positions;
mod trades;

/// Body returned by the dataset reload endpoints.
#[derive(Serialize)]
struct ReloadResponse {
    status: &'static str,
    records: usize,
    skipped_rows: usize,
    version: u64,
}

impl ReloadResponse {
    fn new(status: &'static str, summary: ReloadSummary) -> Self {
        Self {
            status,
            records: summary.records,
            skipped_rows: summary.skipped_rows,
            version: summary.version,
        }
    }
}

pub async fn healthz() -> &'static str {
    "ok"
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                    None
                }
            })
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .route("/healthz", get(healthz))
        .merge(positions::router())
        .merge(trades::router())
        .merge(portfolio::router())
        .merge(dividends::router())
        .with_state(state)
        .layer(cors)
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
