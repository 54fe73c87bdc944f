//! Trading-logic validation of adjusted candidates.
//!
//! Checks run in a fixed order and stop at the first violation; the
//! error carries the offending values for the rejection log.

use crate::models::{CandidateSignal, Direction};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("signal has no take-profit levels")]
    MissingTakeProfit,

    #[error("BUY: SL ({stop_loss}) must be below entry ({entry_min})")]
    BuyStopAboveEntry { stop_loss: f64, entry_min: f64 },
    #[error("BUY: SL distance ({distance:.2}) exceeds maximum allowed ({max:.2})")]
    BuyStopTooFar { distance: f64, max: f64 },
    #[error("BUY: TP1 ({tp1}) must be above entry ({entry_max})")]
    BuyTp1BelowEntry { tp1: f64, entry_max: f64 },
    #[error("BUY: TP{level} ({tp}) must be above TP{prev_level} ({prev})")]
    BuyTpNotAscending {
        level: u8,
        prev_level: u8,
        tp: f64,
        prev: f64,
    },

    #[error("SELL: SL ({stop_loss}) must be above entry ({entry_max})")]
    SellStopBelowEntry { stop_loss: f64, entry_max: f64 },
    #[error("SELL: SL distance ({distance:.2}) exceeds maximum allowed ({max:.2})")]
    SellStopTooFar { distance: f64, max: f64 },
    #[error("SELL: TP1 ({tp1}) must be below entry ({entry_min})")]
    SellTp1AboveEntry { tp1: f64, entry_min: f64 },
    #[error("SELL: TP{level} ({tp}) must be below TP{prev_level} ({prev})")]
    SellTpNotDescending {
        level: u8,
        prev_level: u8,
        tp: f64,
        prev: f64,
    },
}

/// Validate an adjusted candidate against the configured maximum
/// stop-loss distance. First violated rule wins; violations are never
/// aggregated.
pub fn validate(candidate: &CandidateSignal, max_sl_distance: f64) -> Result<(), ValidationError> {
    let tp1 = candidate
        .take_profit_1()
        .ok_or(ValidationError::MissingTakeProfit)?;

    match candidate.direction {
        Direction::Buy => {
            if candidate.stop_loss >= candidate.entry_min {
                return Err(ValidationError::BuyStopAboveEntry {
                    stop_loss: candidate.stop_loss,
                    entry_min: candidate.entry_min,
                });
            }
            let distance = candidate.entry_min - candidate.stop_loss;
            if distance > max_sl_distance {
                return Err(ValidationError::BuyStopTooFar {
                    distance,
                    max: max_sl_distance,
                });
            }
            if tp1 <= candidate.entry_max {
                return Err(ValidationError::BuyTp1BelowEntry {
                    tp1,
                    entry_max: candidate.entry_max,
                });
            }
            let mut prev = tp1;
            for (idx, tp) in candidate.take_profits.iter().take(3).enumerate().skip(1) {
                if *tp <= prev {
                    return Err(ValidationError::BuyTpNotAscending {
                        level: (idx + 1) as u8,
                        prev_level: idx as u8,
                        tp: *tp,
                        prev,
                    });
                }
                prev = *tp;
            }
        }
        Direction::Sell => {
            if candidate.stop_loss <= candidate.entry_max {
                return Err(ValidationError::SellStopBelowEntry {
                    stop_loss: candidate.stop_loss,
                    entry_max: candidate.entry_max,
                });
            }
            let distance = candidate.stop_loss - candidate.entry_max;
            if distance > max_sl_distance {
                return Err(ValidationError::SellStopTooFar {
                    distance,
                    max: max_sl_distance,
                });
            }
            if tp1 >= candidate.entry_min {
                return Err(ValidationError::SellTp1AboveEntry {
                    tp1,
                    entry_min: candidate.entry_min,
                });
            }
            let mut prev = tp1;
            for (idx, tp) in candidate.take_profits.iter().take(3).enumerate().skip(1) {
                if *tp >= prev {
                    return Err(ValidationError::SellTpNotDescending {
                        level: (idx + 1) as u8,
                        prev_level: idx as u8,
                        tp: *tp,
                        prev,
                    });
                }
                prev = *tp;
            }
        }
    }

    Ok(())
}
