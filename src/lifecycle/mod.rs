//! Signal lifecycle: message classification and record expiry.

pub mod classifier;
pub mod sweeper;

pub use classifier::{IgnoreReason, Outcome, SignalProcessor};
pub use sweeper::{handle_sweep, interval_schedule, ExpirySweeper, SweepTick};
