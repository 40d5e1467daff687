use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use std::{net::SocketAddr, path::PathBuf, time::Duration};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub positions_file: PathBuf,
    pub dividends_file: PathBuf,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Zone in which "today" is decided for snapshots.
    pub timezone: Tz,
}

impl Config {
    /// Reads `TB_*` variables, after loading a `.env` file when one exists.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let listen_addr: SocketAddr = var("TB_LISTEN_ADDR", "0.0.0.0:8000")
            .parse()
            .context("Invalid TB_LISTEN_ADDR")?;
        let db_path = var("TB_DB_PATH", "./db/portfolio.db");
        let positions_file = PathBuf::from(var("TB_POSITIONS_FILE", "./data/positions.xlsx"));
        let dividends_file = PathBuf::from(var("TB_DIVIDENDS_FILE", "./data/dividends.xlsx"));
        let cors_allow = var("TB_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = var("TB_REQUEST_TIMEOUT_MS", "30000")
            .parse()
            .context("Invalid TB_REQUEST_TIMEOUT_MS")?;
        let timezone_name = var("TB_TIMEZONE", "UTC");
        let timezone: Tz = timezone_name
            .parse()
            .map_err(|e| anyhow!("Invalid TB_TIMEZONE '{}': {}", timezone_name, e))?;

        Ok(Self {
            listen_addr,
            db_path,
            positions_file,
            dividends_file,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            timezone,
        })
    }
}
