//! Periodic expiry of unresolved signal records.
//!
//! Runs independently of message processing on an apalis cron schedule.
//! The status transition only touches PROCESS/MODIFY records, so a race
//! against a concurrent revision is benign.

use crate::db::{SignalStore, StoreError};
use crate::metrics::Metrics;
use apalis::prelude::*;
use chrono::{DateTime, Utc};
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

/// Transitions long-unresolved records to EXPIRED.
pub struct ExpirySweeper {
    store: Arc<dyn SignalStore>,
    window: chrono::Duration,
    metrics: Option<Arc<Metrics>>,
}

impl ExpirySweeper {
    pub fn new(store: Arc<dyn SignalStore>, expiry_window_secs: i64) -> Self {
        Self {
            store,
            window: chrono::Duration::seconds(expiry_window_secs),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// One sweep pass: expire every PROCESS/MODIFY record older than the
    /// validity window. Returns the number of records transitioned.
    pub async fn sweep(&self) -> Result<u64, StoreError> {
        let cutoff = Utc::now() - self.window;
        let count = self.store.expire_older_than(cutoff).await?;
        if count > 0 {
            info!(
                count,
                window_secs = self.window.num_seconds(),
                "expired {} unresolved signal(s)",
                count
            );
            if let Some(m) = &self.metrics {
                m.signals_expired_total.inc_by(count);
            }
        }
        Ok(count)
    }
}

/// Cron tick driving the sweeper.
#[derive(Debug, Clone, Default)]
pub struct SweepTick(pub DateTime<Utc>);

impl From<DateTime<Utc>> for SweepTick {
    fn from(timestamp: DateTime<Utc>) -> Self {
        Self(timestamp)
    }
}

/// Apalis handler: one sweep per cron tick.
pub async fn handle_sweep(
    _tick: SweepTick,
    sweeper: Data<Arc<ExpirySweeper>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    sweeper.sweep().await?;
    Ok(())
}

/// Build a cron schedule firing every `interval_seconds`.
///
/// Cron format: second minute hour day month weekday.
pub fn interval_schedule(
    interval_seconds: u64,
) -> Result<Schedule, Box<dyn std::error::Error + Send + Sync>> {
    if interval_seconds == 0 {
        return Err("sweep interval must be > 0".into());
    }

    let cron_expr = if interval_seconds >= 60 {
        let minutes = interval_seconds / 60;
        format!("0 */{} * * * *", minutes)
    } else {
        format!("*/{} * * * * *", interval_seconds)
    };

    let schedule = Schedule::from_str(&cron_expr).map_err(|e| {
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Invalid cron expression '{}': {}", cron_expr, e),
        )) as Box<dyn std::error::Error + Send + Sync>
    })?;

    Ok(schedule)
}
