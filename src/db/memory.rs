//! In-memory signal store for tests and the demo binary.
//!
//! Mirrors the Postgres semantics that matter to the classifier: the
//! (channel_id, message_id) uniqueness constraint, latest-by-fingerprint
//! ordering and the status predicates on updates.

use crate::db::{SignalStore, StoreError};
use crate::models::{NewSignalRecord, SignalRecord, SignalStatus, SignalUpdate};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;

#[derive(Default)]
pub struct MemorySignalStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    records: Vec<SignalRecord>,
}

impl MemorySignalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored record, in insertion order.
    pub fn all(&self) -> Vec<SignalRecord> {
        self.inner.lock().unwrap().records.clone()
    }

    pub fn get(&self, id: i64) -> Option<SignalRecord> {
        self.inner
            .lock()
            .unwrap()
            .records
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    /// Insert a record verbatim, bypassing the uniqueness check. Lets
    /// tests seed arbitrary store states.
    pub fn insert_raw(&self, record: SignalRecord) {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id = inner.next_id.max(record.id);
        inner.records.push(record);
    }
}

#[async_trait]
impl SignalStore for MemorySignalStore {
    async fn find_by_channel_and_message(
        &self,
        channel_id: i64,
        message_id: i64,
    ) -> Result<Option<SignalRecord>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .records
            .iter()
            .find(|r| r.channel_id == channel_id && r.message_id == message_id)
            .cloned())
    }

    async fn find_latest_by_fingerprint(
        &self,
        content_hash: &str,
    ) -> Result<Option<SignalRecord>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .records
            .iter()
            .filter(|r| r.content_hash == content_hash)
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn create(&self, record: NewSignalRecord) -> Result<i64, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner
            .records
            .iter()
            .any(|r| r.channel_id == record.channel_id && r.message_id == record.message_id)
        {
            return Err(StoreError::DuplicateKey);
        }

        inner.next_id += 1;
        let id = inner.next_id;
        inner.records.push(SignalRecord {
            id,
            channel_id: record.channel_id,
            message_id: record.message_id,
            symbol: record.symbol,
            direction: record.direction,
            entry_min: record.entry_min,
            entry_max: record.entry_max,
            stop_loss: record.stop_loss,
            take_profit_1: record.take_profit_1,
            take_profit_2: record.take_profit_2,
            take_profit_3: record.take_profit_3,
            status: record.status,
            raw_message: record.raw_message,
            content_hash: record.content_hash,
            created_at: record.created_at,
            updated_at: record.updated_at,
            processed_at: None,
            parse_error: None,
        });
        Ok(id)
    }

    async fn update(&self, id: i64, update: &SignalUpdate) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let record = inner
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;

        record.symbol = update.symbol.clone();
        record.direction = update.direction;
        record.entry_min = update.entry_min;
        record.entry_max = update.entry_max;
        record.stop_loss = update.stop_loss;
        record.take_profit_1 = update.take_profit_1;
        record.take_profit_2 = update.take_profit_2;
        record.take_profit_3 = update.take_profit_3;
        record.status = update.status;
        record.raw_message = update.raw_message.clone();
        record.content_hash = update.content_hash.clone();
        record.updated_at = update.updated_at;
        Ok(())
    }

    async fn update_status(&self, id: i64, status: SignalStatus) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let record = inner
            .records
            .iter_mut()
            .find(|r| r.id == id && r.status.is_active())
            .ok_or(StoreError::NotFound(id))?;

        record.status = status;
        record.updated_at = Utc::now();
        Ok(())
    }

    async fn expire_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let now = Utc::now();
        let mut count = 0;
        for record in &mut inner.records {
            if record.status.is_active() && record.created_at < cutoff {
                record.status = SignalStatus::Expired;
                record.updated_at = now;
                count += 1;
            }
        }
        Ok(count)
    }
}
