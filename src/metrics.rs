//! Prometheus metrics for message processing and expiry sweeps.

use prometheus::{Gauge, IntCounter, Registry};

/// Counters tracking classifier outcomes plus store health.
pub struct Metrics {
    pub registry: Registry,
    pub messages_processed_total: IntCounter,
    pub signals_accepted_total: IntCounter,
    pub signals_revised_total: IntCounter,
    pub signals_ignored_total: IntCounter,
    pub signals_rejected_total: IntCounter,
    pub signals_expired_total: IntCounter,
    pub database_connected: Gauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let messages_processed_total = IntCounter::new(
            "sigmill_messages_processed_total",
            "Messages run through the lifecycle classifier",
        )?;
        let signals_accepted_total = IntCounter::new(
            "sigmill_signals_accepted_total",
            "New signal records created with status PROCESS",
        )?;
        let signals_revised_total = IntCounter::new(
            "sigmill_signals_revised_total",
            "Existing records revised to status MODIFY by an edit",
        )?;
        let signals_ignored_total = IntCounter::new(
            "sigmill_signals_ignored_total",
            "Messages ignored as duplicates, redeliveries or cosmetic edits",
        )?;
        let signals_rejected_total = IntCounter::new(
            "sigmill_signals_rejected_total",
            "Signals rejected by trading-logic validation",
        )?;
        let signals_expired_total = IntCounter::new(
            "sigmill_signals_expired_total",
            "Records transitioned to EXPIRED by the sweeper",
        )?;
        let database_connected = Gauge::new(
            "sigmill_database_connected",
            "1 when the signal store connection is established",
        )?;

        registry.register(Box::new(messages_processed_total.clone()))?;
        registry.register(Box::new(signals_accepted_total.clone()))?;
        registry.register(Box::new(signals_revised_total.clone()))?;
        registry.register(Box::new(signals_ignored_total.clone()))?;
        registry.register(Box::new(signals_rejected_total.clone()))?;
        registry.register(Box::new(signals_expired_total.clone()))?;
        registry.register(Box::new(database_connected.clone()))?;

        Ok(Self {
            registry,
            messages_processed_total,
            signals_accepted_total,
            signals_revised_total,
            signals_ignored_total,
            signals_rejected_total,
            signals_expired_total,
            database_connected,
        })
    }
}
