//! Content fingerprints for duplicate and price-change detection.

use crate::models::CandidateSignal;
use crate::parser::round2;

/// Derive the stable content hash of a signal.
///
/// The canonical string covers symbol, direction, entry bounds, stop-loss
/// and the take-profit list sorted ascending, each value at 2 decimals,
/// so logically-equal signals collide regardless of wording or TP order.
/// The digest is one-way; it is a dedup key, not an identity across edits.
pub fn content_hash(candidate: &CandidateSignal) -> String {
    let mut tps: Vec<f64> = candidate.take_profits.iter().map(|tp| round2(*tp)).collect();
    tps.sort_by(|a, b| a.total_cmp(b));
    let tps_joined = tps
        .iter()
        .map(|tp| format!("{:.2}", tp))
        .collect::<Vec<_>>()
        .join(",");

    let content = format!(
        "{}|{}|{:.2}|{:.2}|{:.2}|[{}]",
        candidate.symbol,
        candidate.direction,
        round2(candidate.entry_min),
        round2(candidate.entry_max),
        round2(candidate.stop_loss),
        tps_joined,
    );

    blake3::hash(content.as_bytes()).to_hex().to_string()
}
