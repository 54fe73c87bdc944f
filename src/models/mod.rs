//! Shared data models spanning the engine layers.

pub mod signal;

pub use signal::{
    CandidateSignal, Direction, NewSignalRecord, RawMessage, SignalRecord, SignalStatus,
    SignalUpdate,
};
