//! Pure signal parsing pipeline: extraction, price adjustment,
//! fingerprinting and trading-logic validation.
//!
//! Every function here is synchronous and side-effect free; malformed
//! input is a normal outcome (`None` / `Err`), never a panic.

pub mod extractor;
pub mod fingerprint;
pub mod normalizer;
pub mod validator;

pub use extractor::SignalExtractor;
pub use fingerprint::content_hash;
pub use normalizer::adjust_prices;
pub use validator::{validate, ValidationError};

/// Round a price to the canonical 2-decimal precision.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
