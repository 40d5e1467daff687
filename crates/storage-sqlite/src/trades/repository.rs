use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use tradebook_core::constants::TRADE_TYPE_SELL;
use tradebook_core::errors::{DatabaseError, Result};
use tradebook_core::trades::{NewTrade, Trade, TradeRepositoryTrait};

use super::model::{NewTradeDB, TradeDB, TradeEntryChangeset};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::trades;
use crate::schema::trades::dsl::*;

pub struct TradeRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TradeRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        TradeRepository { pool, writer }
    }
}

fn into_trades(rows: Vec<TradeDB>) -> Vec<Trade> {
    rows.into_iter().map(Trade::from).collect()
}

#[async_trait]
impl TradeRepositoryTrait for TradeRepository {
    async fn insert_trade(&self, new_trade: NewTrade) -> Result<Trade> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Trade> {
                let new_trade_db: NewTradeDB = new_trade.into();
                let result_db = diesel::insert_into(trades::table)
                    .values(&new_trade_db)
                    .returning(TradeDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Trade::from(result_db))
            })
            .await
    }

    async fn update_trade(&self, trade_id: i32, changes: NewTrade) -> Result<Trade> {
        let changeset: TradeEntryChangeset = changes.into();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Trade> {
                let updated = diesel::update(trades.find(trade_id))
                    .set(&changeset)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if updated == 0 {
                    return Err(
                        DatabaseError::NotFound(format!("Trade {} not found", trade_id)).into(),
                    );
                }
                let result_db = trades
                    .find(trade_id)
                    .select(TradeDB::as_select())
                    .first::<TradeDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Trade::from(result_db))
            })
            .await
    }

    fn list_realised(&self) -> Result<Vec<Trade>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = trades
            .filter(sell_date.is_not_null())
            .filter(qty.eq(0))
            .filter(trade_type.eq(TRADE_TYPE_SELL))
            .order((sell_date.desc(), id.desc()))
            .select(TradeDB::as_select())
            .load::<TradeDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(into_trades(rows))
    }

    fn list_all(&self) -> Result<Vec<Trade>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = trades
            .order((buy_date.asc(), id.asc()))
            .select(TradeDB::as_select())
            .load::<TradeDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(into_trades(rows))
    }

    fn list_open_lots(&self, lot_symbol: &str) -> Result<Vec<Trade>> {
        debug!("Loading open lots for {}", lot_symbol);
        let mut conn = get_connection(&self.pool)?;
        let rows = trades
            .filter(symbol.eq(lot_symbol))
            .filter(sell_date.is_null())
            .filter(qty.gt(0))
            .order(id.asc())
            .select(TradeDB::as_select())
            .load::<TradeDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(into_trades(rows))
    }
}
