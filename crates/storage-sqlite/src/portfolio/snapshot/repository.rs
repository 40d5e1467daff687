use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use tradebook_core::constants::DATE_FORMAT;
use tradebook_core::errors::Result;
use tradebook_core::portfolio::snapshot::{PortfolioSnapshot, SnapshotRepositoryTrait};

use super::model::PortfolioSnapshotDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::portfolio_snapshots;
use crate::schema::portfolio_snapshots::dsl::*;

pub struct SnapshotRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SnapshotRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl SnapshotRepositoryTrait for SnapshotRepository {
    fn get_latest(&self) -> Result<Option<PortfolioSnapshot>> {
        let mut conn = get_connection(&self.pool)?;
        let row = portfolio_snapshots
            .order(date.desc())
            .select(PortfolioSnapshotDB::as_select())
            .first::<PortfolioSnapshotDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(PortfolioSnapshot::from))
    }

    fn get_latest_before(&self, before: NaiveDate) -> Result<Option<PortfolioSnapshot>> {
        let mut conn = get_connection(&self.pool)?;
        let row = portfolio_snapshots
            .filter(date.lt(before.format(DATE_FORMAT).to_string()))
            .order(date.desc())
            .select(PortfolioSnapshotDB::as_select())
            .first::<PortfolioSnapshotDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(PortfolioSnapshot::from))
    }

    async fn replace_for_date(&self, snapshot: PortfolioSnapshot) -> Result<bool> {
        let row: PortfolioSnapshotDB = snapshot.into();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<bool> {
                // Delete and insert share the writer's transaction.
                let removed = diesel::delete(portfolio_snapshots.find(row.date.clone()))
                    .execute(conn)
                    .into_core()?;
                diesel::insert_into(portfolio_snapshots::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                debug!("Stored snapshot for {} (replaced: {})", row.date, removed > 0);
                Ok(removed > 0)
            })
            .await
    }

    fn list_all(&self) -> Result<Vec<PortfolioSnapshot>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = portfolio_snapshots
            .order(date.asc())
            .select(PortfolioSnapshotDB::as_select())
            .load::<PortfolioSnapshotDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(PortfolioSnapshot::from).collect())
    }
}
