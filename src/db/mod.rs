//! Store boundary for persisted signal records.
//!
//! The lifecycle classifier only ever talks to [`SignalStore`], so its
//! decision logic is testable against [`MemorySignalStore`] without a
//! running database. The store enforces the (channel_id, message_id)
//! uniqueness constraint; a violation surfaces as
//! [`StoreError::DuplicateKey`], which callers must treat as the
//! already-exists case rather than a failure.

pub mod memory;
pub mod postgres;

pub use memory::MemorySignalStore;
pub use postgres::PostgresSignalStore;

use crate::models::{NewSignalRecord, SignalRecord, SignalStatus, SignalUpdate};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store connection failed: {0}")]
    Connection(String),
    #[error("store query failed: {0}")]
    Query(#[from] tokio_postgres::Error),
    #[error("record violates the (channel, message) uniqueness constraint")]
    DuplicateKey,
    #[error("signal record {0} not found")]
    NotFound(i64),
}

#[async_trait]
pub trait SignalStore: Send + Sync {
    /// Look up the record for a (channel, message) pair, if any.
    async fn find_by_channel_and_message(
        &self,
        channel_id: i64,
        message_id: i64,
    ) -> Result<Option<SignalRecord>, StoreError>;

    /// Most recently created record carrying this content hash.
    async fn find_latest_by_fingerprint(
        &self,
        content_hash: &str,
    ) -> Result<Option<SignalRecord>, StoreError>;

    /// Insert a new record, returning its assigned id.
    async fn create(&self, record: NewSignalRecord) -> Result<i64, StoreError>;

    /// Overwrite the price/content fields of an existing record.
    async fn update(&self, id: i64, update: &SignalUpdate) -> Result<(), StoreError>;

    /// Transition a record's status. Only PROCESS/MODIFY records are
    /// overwritten, so a concurrent DONE marking cannot be stomped.
    async fn update_status(&self, id: i64, status: SignalStatus) -> Result<(), StoreError>;

    /// Bulk-transition PROCESS/MODIFY records created before `cutoff` to
    /// EXPIRED, returning how many rows changed.
    async fn expire_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError>;
}
