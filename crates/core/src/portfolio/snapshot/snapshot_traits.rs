//! Repository and service traits for portfolio snapshots.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::snapshot_model::{LiveIndex, PortfolioSnapshot, SnapshotOutcome};
use crate::errors::Result;

/// Storage for the one-row-per-date snapshot ledger.
#[async_trait]
pub trait SnapshotRepositoryTrait: Send + Sync {
    /// Most recent snapshot by date.
    fn get_latest(&self) -> Result<Option<PortfolioSnapshot>>;

    /// Most recent snapshot dated strictly before `date`.
    fn get_latest_before(&self, date: NaiveDate) -> Result<Option<PortfolioSnapshot>>;

    /// Writes the snapshot for its date, replacing any row already stored
    /// for that date in the same transaction. Returns true when a row was
    /// replaced.
    async fn replace_for_date(&self, snapshot: PortfolioSnapshot) -> Result<bool>;

    /// Every snapshot, oldest first.
    fn list_all(&self) -> Result<Vec<PortfolioSnapshot>>;
}

#[async_trait]
pub trait SnapshotServiceTrait: Send + Sync {
    /// Computes and stores the snapshot for `today`. Rejected on weekends.
    async fn take_snapshot(&self, net_cash_flow: Decimal, today: NaiveDate)
        -> Result<SnapshotOutcome>;

    /// Same computation as [`take_snapshot`](Self::take_snapshot), without
    /// gating or persistence.
    fn calculate_live_index(&self, net_cash_flow: Decimal, today: NaiveDate) -> Result<LiveIndex>;

    fn get_history(&self) -> Result<Vec<PortfolioSnapshot>>;
}
