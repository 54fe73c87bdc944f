//! Signal domain types shared across the parsing and lifecycle layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trade direction of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Buy => "BUY",
            Direction::Sell => "SELL",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "BUY" => Some(Direction::Buy),
            "SELL" => Some(Direction::Sell),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Processing status of a persisted signal record.
///
/// `Done` is set exclusively by the downstream consumer; this engine only
/// produces `Process`, `Modify` and `Expired` transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalStatus {
    #[serde(rename = "PROCESS")]
    Process,
    #[serde(rename = "MODIFY")]
    Modify,
    #[serde(rename = "DONE")]
    Done,
    #[serde(rename = "INVALID")]
    Invalid,
    #[serde(rename = "ERROR")]
    Error,
    #[serde(rename = "EXPIRED")]
    Expired,
}

impl SignalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalStatus::Process => "PROCESS",
            SignalStatus::Modify => "MODIFY",
            SignalStatus::Done => "DONE",
            SignalStatus::Invalid => "INVALID",
            SignalStatus::Error => "ERROR",
            SignalStatus::Expired => "EXPIRED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PROCESS" => Some(SignalStatus::Process),
            "MODIFY" => Some(SignalStatus::Modify),
            "DONE" => Some(SignalStatus::Done),
            "INVALID" => Some(SignalStatus::Invalid),
            "ERROR" => Some(SignalStatus::Error),
            "EXPIRED" => Some(SignalStatus::Expired),
            _ => None,
        }
    }

    /// Statuses the sweeper and downstream consumer are allowed to
    /// transition away from.
    pub fn is_active(&self) -> bool {
        matches!(self, SignalStatus::Process | SignalStatus::Modify)
    }
}

impl std::fmt::Display for SignalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chat message as delivered by the transport layer.
#[derive(Debug, Clone)]
pub struct RawMessage {
    pub channel_id: i64,
    pub message_id: i64,
    pub text: String,
    pub is_edit: bool,
    pub received_at: DateTime<Utc>,
}

/// Structured signal extracted from message text.
///
/// Prices are rounded to 2 decimals. `take_profits` is deduplicated and
/// keeps first-seen order; the first three levels are persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSignal {
    pub symbol: String,
    pub direction: Direction,
    pub entry_min: f64,
    pub entry_max: f64,
    pub stop_loss: f64,
    pub take_profits: Vec<f64>,
}

impl CandidateSignal {
    pub fn take_profit_1(&self) -> Option<f64> {
        self.take_profits.first().copied()
    }

    pub fn take_profit_2(&self) -> Option<f64> {
        self.take_profits.get(1).copied()
    }

    pub fn take_profit_3(&self) -> Option<f64> {
        self.take_profits.get(2).copied()
    }
}

/// A persisted signal record as stored by the [`SignalStore`] collaborator.
///
/// At most one record exists per (channel_id, message_id) pair; edits
/// mutate the record in place and never create a second row.
///
/// [`SignalStore`]: crate::db::SignalStore
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub id: i64,
    pub channel_id: i64,
    pub message_id: i64,
    pub symbol: String,
    pub direction: Direction,
    pub entry_min: f64,
    pub entry_max: f64,
    pub stop_loss: f64,
    pub take_profit_1: f64,
    pub take_profit_2: Option<f64>,
    pub take_profit_3: Option<f64>,
    pub status: SignalStatus,
    pub raw_message: String,
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub parse_error: Option<String>,
}

/// Staging form of a [`SignalRecord`] before the store assigns an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSignalRecord {
    pub channel_id: i64,
    pub message_id: i64,
    pub symbol: String,
    pub direction: Direction,
    pub entry_min: f64,
    pub entry_max: f64,
    pub stop_loss: f64,
    pub take_profit_1: f64,
    pub take_profit_2: Option<f64>,
    pub take_profit_3: Option<f64>,
    pub status: SignalStatus,
    pub raw_message: String,
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field set applied to an existing record on a validated price revision.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalUpdate {
    pub symbol: String,
    pub direction: Direction,
    pub entry_min: f64,
    pub entry_max: f64,
    pub stop_loss: f64,
    pub take_profit_1: f64,
    pub take_profit_2: Option<f64>,
    pub take_profit_3: Option<f64>,
    pub status: SignalStatus,
    pub raw_message: String,
    pub content_hash: String,
    pub updated_at: DateTime<Utc>,
}
