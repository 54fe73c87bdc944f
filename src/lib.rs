//! Sigmill turns free-form chat trading signals into validated,
//! deduplicated, time-bounded records for downstream automated trading.
//!
//! Pipeline: raw text → [`parser::SignalExtractor`] →
//! [`parser::adjust_prices`] → [`parser::content_hash`] →
//! [`parser::validate`] → [`lifecycle::SignalProcessor`] → persisted
//! [`models::SignalRecord`]. The [`lifecycle::ExpirySweeper`] runs
//! independently against the same store.

pub mod config;
pub mod db;
pub mod lifecycle;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod parser;
