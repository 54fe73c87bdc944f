//! Deterministic per-direction price adjustment.

use crate::models::{CandidateSignal, Direction};
use crate::parser::round2;

/// Apply the broker/feed offset compensation to a freshly extracted
/// candidate. BUY: stop-loss down, take-profits up; SELL: signs invert.
///
/// Applied exactly once, between extraction and hashing/validation, so
/// every downstream stage sees only adjusted values. Results are
/// re-rounded to keep float noise out of fingerprints.
pub fn adjust_prices(mut candidate: CandidateSignal, adjustment: f64) -> CandidateSignal {
    match candidate.direction {
        Direction::Buy => {
            candidate.stop_loss = round2(candidate.stop_loss - adjustment);
            for tp in &mut candidate.take_profits {
                *tp = round2(*tp + adjustment);
            }
        }
        Direction::Sell => {
            candidate.stop_loss = round2(candidate.stop_loss + adjustment);
            for tp in &mut candidate.take_profits {
                *tp = round2(*tp - adjustment);
            }
        }
    }
    candidate
}
