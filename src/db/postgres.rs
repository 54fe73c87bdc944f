//! Postgres-backed signal store.

use crate::db::{SignalStore, StoreError};
use crate::models::{Direction, NewSignalRecord, SignalRecord, SignalStatus, SignalUpdate};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_postgres::error::SqlState;
use tokio_postgres::{Client, NoTls, Row};

pub struct PostgresSignalStore {
    client: Client,
}

impl PostgresSignalStore {
    /// Connect and ensure the schema exists. The connection task is
    /// spawned onto the current runtime.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let (client, connection) = tokio_postgres::connect(database_url, NoTls)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "signal store connection error");
            }
        });

        let store = Self { client };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        self.client
            .batch_execute(
                "CREATE TABLE IF NOT EXISTS signals (
                    id BIGSERIAL PRIMARY KEY,
                    channel_id BIGINT NOT NULL,
                    message_id BIGINT NOT NULL,
                    symbol TEXT NOT NULL,
                    direction TEXT NOT NULL CHECK (direction IN ('BUY', 'SELL')),
                    entry_min DOUBLE PRECISION NOT NULL,
                    entry_max DOUBLE PRECISION NOT NULL,
                    stop_loss DOUBLE PRECISION NOT NULL,
                    take_profit_1 DOUBLE PRECISION NOT NULL,
                    take_profit_2 DOUBLE PRECISION,
                    take_profit_3 DOUBLE PRECISION,
                    status TEXT NOT NULL CHECK (
                        status IN ('PROCESS', 'MODIFY', 'DONE', 'INVALID', 'ERROR', 'EXPIRED')
                    ),
                    raw_message TEXT NOT NULL,
                    content_hash TEXT NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL,
                    updated_at TIMESTAMPTZ NOT NULL,
                    processed_at TIMESTAMPTZ,
                    parse_error TEXT,
                    CONSTRAINT uix_channel_message UNIQUE (channel_id, message_id)
                );
                CREATE INDEX IF NOT EXISTS idx_signals_content_hash
                    ON signals (content_hash);",
            )
            .await?;
        Ok(())
    }
}

const RECORD_COLUMNS: &str = "id, channel_id, message_id, symbol, direction, entry_min, \
     entry_max, stop_loss, take_profit_1, take_profit_2, take_profit_3, status, raw_message, \
     content_hash, created_at, updated_at, processed_at, parse_error";

fn record_from_row(row: &Row) -> Result<SignalRecord, StoreError> {
    let direction_str: String = row.get(4);
    let status_str: String = row.get(11);
    // CHECK constraints guarantee these parse.
    let direction = Direction::from_str(&direction_str).unwrap_or(Direction::Buy);
    let status = SignalStatus::from_str(&status_str).unwrap_or(SignalStatus::Error);

    Ok(SignalRecord {
        id: row.get(0),
        channel_id: row.get(1),
        message_id: row.get(2),
        symbol: row.get(3),
        direction,
        entry_min: row.get(5),
        entry_max: row.get(6),
        stop_loss: row.get(7),
        take_profit_1: row.get(8),
        take_profit_2: row.get(9),
        take_profit_3: row.get(10),
        status,
        raw_message: row.get(12),
        content_hash: row.get(13),
        created_at: row.get(14),
        updated_at: row.get(15),
        processed_at: row.get(16),
        parse_error: row.get(17),
    })
}

#[async_trait]
impl SignalStore for PostgresSignalStore {
    async fn find_by_channel_and_message(
        &self,
        channel_id: i64,
        message_id: i64,
    ) -> Result<Option<SignalRecord>, StoreError> {
        let query = format!(
            "SELECT {RECORD_COLUMNS} FROM signals WHERE channel_id = $1 AND message_id = $2"
        );
        let rows = self.client.query(&query, &[&channel_id, &message_id]).await?;
        rows.first().map(record_from_row).transpose()
    }

    async fn find_latest_by_fingerprint(
        &self,
        content_hash: &str,
    ) -> Result<Option<SignalRecord>, StoreError> {
        let query = format!(
            "SELECT {RECORD_COLUMNS} FROM signals WHERE content_hash = $1 \
             ORDER BY created_at DESC LIMIT 1"
        );
        let rows = self.client.query(&query, &[&content_hash]).await?;
        rows.first().map(record_from_row).transpose()
    }

    async fn create(&self, record: NewSignalRecord) -> Result<i64, StoreError> {
        let result = self
            .client
            .query_one(
                "INSERT INTO signals (channel_id, message_id, symbol, direction, entry_min, \
                 entry_max, stop_loss, take_profit_1, take_profit_2, take_profit_3, status, \
                 raw_message, content_hash, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
                 RETURNING id",
                &[
                    &record.channel_id,
                    &record.message_id,
                    &record.symbol,
                    &record.direction.as_str(),
                    &record.entry_min,
                    &record.entry_max,
                    &record.stop_loss,
                    &record.take_profit_1,
                    &record.take_profit_2,
                    &record.take_profit_3,
                    &record.status.as_str(),
                    &record.raw_message,
                    &record.content_hash,
                    &record.created_at,
                    &record.updated_at,
                ],
            )
            .await;

        match result {
            Ok(row) => Ok(row.get(0)),
            Err(e) if e.code() == Some(&SqlState::UNIQUE_VIOLATION) => {
                Err(StoreError::DuplicateKey)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&self, id: i64, update: &SignalUpdate) -> Result<(), StoreError> {
        let rows_affected = self
            .client
            .execute(
                "UPDATE signals SET symbol = $1, direction = $2, entry_min = $3, \
                 entry_max = $4, stop_loss = $5, take_profit_1 = $6, take_profit_2 = $7, \
                 take_profit_3 = $8, status = $9, raw_message = $10, content_hash = $11, \
                 updated_at = $12 \
                 WHERE id = $13",
                &[
                    &update.symbol,
                    &update.direction.as_str(),
                    &update.entry_min,
                    &update.entry_max,
                    &update.stop_loss,
                    &update.take_profit_1,
                    &update.take_profit_2,
                    &update.take_profit_3,
                    &update.status.as_str(),
                    &update.raw_message,
                    &update.content_hash,
                    &update.updated_at,
                    &id,
                ],
            )
            .await?;

        if rows_affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn update_status(&self, id: i64, status: SignalStatus) -> Result<(), StoreError> {
        let rows_affected = self
            .client
            .execute(
                "UPDATE signals SET status = $1, updated_at = $2 \
                 WHERE id = $3 AND status IN ('PROCESS', 'MODIFY')",
                &[&status.as_str(), &Utc::now(), &id],
            )
            .await?;

        if rows_affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn expire_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let count = self
            .client
            .execute(
                "UPDATE signals SET status = 'EXPIRED', updated_at = $1 \
                 WHERE status IN ('PROCESS', 'MODIFY') AND created_at < $2",
                &[&Utc::now(), &cutoff],
            )
            .await?;
        Ok(count)
    }
}
