//! Lifecycle classification of incoming messages against the store.
//!
//! Decides, per message, whether it creates a new record, revises an
//! existing one, or is ignored, and performs at most one store write.

use crate::config::EngineConfig;
use crate::db::{SignalStore, StoreError};
use crate::metrics::Metrics;
use crate::models::{
    CandidateSignal, NewSignalRecord, RawMessage, SignalStatus, SignalUpdate,
};
use crate::parser::{adjust_prices, content_hash, validate, SignalExtractor, ValidationError};
use chrono::Duration;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Why a message was ignored without touching the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Same content re-broadcast within the duplicate window.
    DuplicateWindow,
    /// Edit that left the fingerprint unchanged.
    UnchangedEdit,
    /// Record for this (channel, message) pair already exists.
    AlreadyExists,
    /// Edit of a message that never parsed into a record.
    NeverParsed,
}

/// Classification result for one message.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The text does not qualify as a signal at all.
    NotASignal,
    /// New record created with status PROCESS.
    Accepted { id: i64 },
    /// Existing record revised to status MODIFY.
    Revised { id: i64 },
    Ignored(IgnoreReason),
    Rejected(ValidationError),
}

/// Runs the full extract → adjust → hash → validate → classify pipeline.
pub struct SignalProcessor {
    extractor: SignalExtractor,
    config: EngineConfig,
    store: Arc<dyn SignalStore>,
    metrics: Option<Arc<Metrics>>,
}

impl SignalProcessor {
    pub fn new(config: EngineConfig, store: Arc<dyn SignalStore>) -> Self {
        let extractor = SignalExtractor::new(&config.allowed_symbols);
        Self {
            extractor,
            config,
            store,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Classify one new or edited message.
    ///
    /// Rejections and ignores never write to the store; store failures
    /// propagate unchanged so the caller can retry the whole message.
    pub async fn process(&self, msg: &RawMessage) -> Result<Outcome, StoreError> {
        if let Some(m) = &self.metrics {
            m.messages_processed_total.inc();
        }

        let Some(extracted) = self.extractor.extract(&msg.text) else {
            debug!(
                channel_id = msg.channel_id,
                message_id = msg.message_id,
                "message ignored: not a signal"
            );
            return Ok(Outcome::NotASignal);
        };

        let candidate = adjust_prices(extracted, self.config.price_adjustment);
        let hash = content_hash(&candidate);

        // Relay channels re-broadcast the same signal within the same
        // instant; ignore identical content seen moments ago.
        if !msg.is_edit {
            if let Some(latest) = self.store.find_latest_by_fingerprint(&hash).await? {
                let window = Duration::seconds(self.config.duplicate_window_secs);
                if msg.received_at - latest.created_at < window {
                    warn!(
                        channel_id = msg.channel_id,
                        message_id = msg.message_id,
                        original_id = latest.id,
                        "ignoring duplicate signal inside {}s window",
                        self.config.duplicate_window_secs
                    );
                    return Ok(self.ignored(IgnoreReason::DuplicateWindow));
                }
            }
        }

        let existing = self
            .store
            .find_by_channel_and_message(msg.channel_id, msg.message_id)
            .await?;

        if msg.is_edit {
            return self.process_edit(msg, candidate, hash, existing).await;
        }

        if let Some(record) = existing {
            debug!(
                channel_id = msg.channel_id,
                message_id = msg.message_id,
                id = record.id,
                "message already processed, skipping"
            );
            return Ok(self.ignored(IgnoreReason::AlreadyExists));
        }

        if let Err(reason) = validate(&candidate, self.config.max_sl_distance) {
            return Ok(self.rejected(msg, &candidate, reason));
        }
        let Some(tp1) = candidate.take_profit_1() else {
            return Ok(Outcome::NotASignal);
        };

        let record = NewSignalRecord {
            channel_id: msg.channel_id,
            message_id: msg.message_id,
            symbol: candidate.symbol.clone(),
            direction: candidate.direction,
            entry_min: candidate.entry_min,
            entry_max: candidate.entry_max,
            stop_loss: candidate.stop_loss,
            take_profit_1: tp1,
            take_profit_2: candidate.take_profit_2(),
            take_profit_3: candidate.take_profit_3(),
            status: SignalStatus::Process,
            raw_message: msg.text.clone(),
            content_hash: hash,
            created_at: msg.received_at,
            updated_at: msg.received_at,
        };

        // The store's uniqueness constraint is the authoritative backstop
        // against a concurrent duplicate arrival.
        match self.store.create(record).await {
            Ok(id) => {
                info!(
                    id,
                    symbol = %candidate.symbol,
                    direction = %candidate.direction,
                    entry_min = candidate.entry_min,
                    entry_max = candidate.entry_max,
                    stop_loss = candidate.stop_loss,
                    take_profits = ?candidate.take_profits,
                    "signal saved"
                );
                if let Some(m) = &self.metrics {
                    m.signals_accepted_total.inc();
                }
                Ok(Outcome::Accepted { id })
            }
            Err(StoreError::DuplicateKey) => Ok(self.ignored(IgnoreReason::AlreadyExists)),
            Err(e) => Err(e),
        }
    }

    async fn process_edit(
        &self,
        msg: &RawMessage,
        candidate: CandidateSignal,
        hash: String,
        existing: Option<crate::models::SignalRecord>,
    ) -> Result<Outcome, StoreError> {
        let Some(record) = existing else {
            debug!(
                channel_id = msg.channel_id,
                message_id = msg.message_id,
                "edit of a message that never parsed, nothing to revise"
            );
            return Ok(self.ignored(IgnoreReason::NeverParsed));
        };

        if record.content_hash == hash {
            debug!(
                id = record.id,
                "message edited but prices unchanged, ignoring"
            );
            return Ok(self.ignored(IgnoreReason::UnchangedEdit));
        }

        if let Err(reason) = validate(&candidate, self.config.max_sl_distance) {
            return Ok(self.rejected(msg, &candidate, reason));
        }
        let Some(tp1) = candidate.take_profit_1() else {
            return Ok(Outcome::NotASignal);
        };

        let update = SignalUpdate {
            symbol: candidate.symbol.clone(),
            direction: candidate.direction,
            entry_min: candidate.entry_min,
            entry_max: candidate.entry_max,
            stop_loss: candidate.stop_loss,
            take_profit_1: tp1,
            take_profit_2: candidate.take_profit_2(),
            take_profit_3: candidate.take_profit_3(),
            status: SignalStatus::Modify,
            raw_message: msg.text.clone(),
            content_hash: hash,
            updated_at: msg.received_at,
        };
        self.store.update(record.id, &update).await?;

        info!(
            id = record.id,
            symbol = %candidate.symbol,
            direction = %candidate.direction,
            stop_loss = candidate.stop_loss,
            take_profits = ?candidate.take_profits,
            "signal revised"
        );
        if let Some(m) = &self.metrics {
            m.signals_revised_total.inc();
        }
        Ok(Outcome::Revised { id: record.id })
    }

    fn ignored(&self, reason: IgnoreReason) -> Outcome {
        if let Some(m) = &self.metrics {
            m.signals_ignored_total.inc();
        }
        Outcome::Ignored(reason)
    }

    fn rejected(
        &self,
        msg: &RawMessage,
        candidate: &CandidateSignal,
        reason: ValidationError,
    ) -> Outcome {
        warn!(
            channel_id = msg.channel_id,
            message_id = msg.message_id,
            entry_min = candidate.entry_min,
            entry_max = candidate.entry_max,
            stop_loss = candidate.stop_loss,
            take_profits = ?candidate.take_profits,
            reason = %reason,
            "signal rejected by validation"
        );
        if let Some(m) = &self.metrics {
            m.signals_rejected_total.inc();
        }
        Outcome::Rejected(reason)
    }
}
