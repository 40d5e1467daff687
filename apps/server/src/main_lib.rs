use std::sync::Arc;

use chrono_tz::Tz;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use tradebook_core::{
    dividends::{DividendService, DividendServiceTrait},
    portfolio::snapshot::{SnapshotService, SnapshotServiceTrait},
    positions::{PositionService, PositionServiceTrait},
    tabular::TabularSourceTrait,
    trades::{TradeService, TradeServiceTrait},
};
use tradebook_spreadsheet::SpreadsheetSource;
use tradebook_storage_sqlite::{db, SnapshotRepository, TradeRepository};

pub struct AppState {
    pub position_service: Arc<dyn PositionServiceTrait>,
    pub dividend_service: Arc<dyn DividendServiceTrait>,
    pub trade_service: Arc<dyn TradeServiceTrait>,
    pub snapshot_service: Arc<dyn SnapshotServiceTrait>,
    pub timezone: Tz,
}

/// Installs the global subscriber. `log` records from the library crates
/// are forwarded through it.
pub fn init_tracing() {
    let log_format = std::env::var("TB_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let trade_repository = Arc::new(TradeRepository::new(pool.clone(), writer.clone()));
    let snapshot_repository = Arc::new(SnapshotRepository::new(pool.clone(), writer));

    let positions_source: Arc<dyn TabularSourceTrait> =
        Arc::new(SpreadsheetSource::new(config.positions_file.clone()));
    let dividends_source: Arc<dyn TabularSourceTrait> =
        Arc::new(SpreadsheetSource::new(config.dividends_file.clone()));

    let position_service: Arc<dyn PositionServiceTrait> =
        Arc::new(PositionService::new(positions_source));
    let dividend_service: Arc<dyn DividendServiceTrait> =
        Arc::new(DividendService::new(dividends_source));
    let trade_service: Arc<dyn TradeServiceTrait> = Arc::new(TradeService::new(trade_repository));
    let snapshot_service: Arc<dyn SnapshotServiceTrait> = Arc::new(SnapshotService::new(
        snapshot_repository,
        position_service.clone(),
    ));

    // Warm the caches; a missing sheet is reported again on first use.
    if let Err(e) = position_service.reload() {
        tracing::warn!("Positions not loaded at start-up: {}", e);
    }
    if let Err(e) = dividend_service.reload() {
        tracing::warn!("Dividends not loaded at start-up: {}", e);
    }

    Ok(Arc::new(AppState {
        position_service,
        dividend_service,
        trade_service,
        snapshot_service,
        timezone: config.timezone,
    }))
}
