//! Keyword/regex extraction of signal fields from free-form message text.
//!
//! Extraction is strict: symbol, direction, entry, stop-loss and at least
//! one take-profit are all mandatory, and a missing field fails the whole
//! extraction rather than producing a partial signal.

use crate::models::{CandidateSignal, Direction};
use crate::parser::round2;
use regex::Regex;

/// Symbols always recognized, before any configured additions.
const BASE_VOCABULARY: [&str; 3] = ["XAUUSD", "XAU/?USD", "GOLD"];

/// Keywords that close an open take-profit block when they appear on a
/// line without a take-profit keyword.
const TP_CLOSE_KEYWORDS: [&str; 3] = ["ENTRY", "STOP LOSS", "SL:"];

/// Line-scanning state for take-profit collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TpScanState {
    Outside,
    Inside,
}

/// Extracts [`CandidateSignal`]s from chat message text.
///
/// Patterns are flexible: they anchor on a keyword, then skip non-numeric
/// characters before capturing the value.
pub struct SignalExtractor {
    allowed_symbols: Vec<String>,
    symbol: Regex,
    direction: Regex,
    entry_range: Regex,
    entry_single: Regex,
    stop_loss: Regex,
    take_profit_line: Regex,
    level: Regex,
}

impl SignalExtractor {
    /// Build an extractor recognizing the base vocabulary plus
    /// `allowed_symbols`. Only matches present in `allowed_symbols`
    /// survive filtering.
    pub fn new(allowed_symbols: &[String]) -> Self {
        let allowed: Vec<String> = allowed_symbols.iter().map(|s| s.to_uppercase()).collect();

        let mut alternatives: Vec<String> =
            BASE_VOCABULARY.iter().map(|s| s.to_string()).collect();
        for sym in &allowed {
            if !BASE_VOCABULARY.contains(&sym.as_str()) {
                alternatives.push(regex::escape(sym));
            }
        }
        let symbol_pattern = format!(r"(?i)\b({})\b", alternatives.join("|"));

        Self {
            allowed_symbols: allowed,
            symbol: Regex::new(&symbol_pattern).unwrap(),
            direction: Regex::new(r"(?i)\b(BUY|SELL|LONG|SHORT)\b").unwrap(),
            entry_range: Regex::new(
                r"(?i)(?:entry|вход)[^0-9]*(\d+(?:\.\d+)?)\s*(?:to|-|–|—)\s*(\d+(?:\.\d+)?)",
            )
            .unwrap(),
            entry_single: Regex::new(r"(?i)(?:entry|@|вход)[^0-9]*(\d+(?:\.\d+)?)").unwrap(),
            stop_loss: Regex::new(r"(?i)(?:sl|stop\s*loss|стоп)[^0-9]*(\d+(?:\.\d+)?)").unwrap(),
            take_profit_line: Regex::new(r"(?i)(?:tp|take\s*profit|тейк)[^0-9]*").unwrap(),
            // Minimum 3 digits: filters out TP index labels like "1", "2".
            level: Regex::new(r"\d{3,}(?:\.\d+)?").unwrap(),
        }
    }

    /// Extract a candidate signal, or `None` when the text does not
    /// qualify. Prices are rounded to 2 decimals; no adjustment applied.
    pub fn extract(&self, text: &str) -> Option<CandidateSignal> {
        let cleaned = clean_markup(text);

        let symbol = self.extract_symbol(&cleaned)?;
        let direction = self.extract_direction(&cleaned)?;
        let (entry_min, entry_max) = self.extract_entry_range(&cleaned)?;
        let stop_loss = self.extract_stop_loss(&cleaned)?;
        let take_profits = self.extract_take_profits(&cleaned);
        if take_profits.is_empty() {
            return None;
        }

        Some(CandidateSignal {
            symbol,
            direction,
            entry_min: round2(entry_min),
            entry_max: round2(entry_max),
            stop_loss: round2(stop_loss),
            take_profits: take_profits.into_iter().map(round2).collect(),
        })
    }

    /// Match and canonicalize the instrument symbol. Gold aliases collapse
    /// to XAUUSD; symbols outside the allowed set are rejected.
    fn extract_symbol(&self, text: &str) -> Option<String> {
        let caps = self.symbol.captures(text)?;
        let sym = caps.get(1)?.as_str().to_uppercase().replace('/', "");
        if !self.allowed_symbols.iter().any(|s| *s == sym) {
            return None;
        }
        if sym == "GOLD" || sym == "XAUUSD" {
            return Some("XAUUSD".to_string());
        }
        Some(sym)
    }

    fn extract_direction(&self, text: &str) -> Option<Direction> {
        let caps = self.direction.captures(text)?;
        match caps.get(1)?.as_str().to_uppercase().as_str() {
            "BUY" | "LONG" => Some(Direction::Buy),
            _ => Some(Direction::Sell),
        }
    }

    /// Entry range if present, otherwise a single entry collapsed to
    /// min == max. The two range bounds may be stated in either order.
    fn extract_entry_range(&self, text: &str) -> Option<(f64, f64)> {
        if let Some(caps) = self.entry_range.captures(text) {
            let a: f64 = caps.get(1)?.as_str().parse().ok()?;
            let b: f64 = caps.get(2)?.as_str().parse().ok()?;
            return Some((a.min(b), a.max(b)));
        }
        let caps = self.entry_single.captures(text)?;
        let value: f64 = caps.get(1)?.as_str().parse().ok()?;
        Some((value, value))
    }

    fn extract_stop_loss(&self, text: &str) -> Option<f64> {
        let caps = self.stop_loss.captures(text)?;
        caps.get(1)?.as_str().parse().ok()
    }

    /// Line-scanning state machine over the message.
    ///
    /// A take-profit keyword opens a block and contributes the numbers
    /// after the keyword. Inside a block, a line carrying an entry or
    /// stop-loss keyword closes it; a blank line with no numbers closes
    /// it; any other line contributes its numbers. Levels are
    /// deduplicated preserving first-seen order.
    fn extract_take_profits(&self, text: &str) -> Vec<f64> {
        let mut levels: Vec<f64> = Vec::new();
        let mut state = TpScanState::Outside;

        for line in text.lines() {
            let upper = line.to_uppercase();

            if let Some(m) = self.take_profit_line.find(&upper) {
                state = TpScanState::Inside;
                self.collect_levels(&upper[m.end()..], &mut levels);
                continue;
            }

            if state == TpScanState::Inside {
                if TP_CLOSE_KEYWORDS.iter().any(|kw| upper.contains(kw)) {
                    state = TpScanState::Outside;
                    continue;
                }
                let before = levels.len();
                self.collect_levels(&upper, &mut levels);
                if levels.len() == before && line.trim().is_empty() {
                    state = TpScanState::Outside;
                }
            }
        }

        levels
    }

    fn collect_levels(&self, text: &str, levels: &mut Vec<f64>) {
        for m in self.level.find_iter(text) {
            if let Ok(value) = m.as_str().parse::<f64>() {
                if !levels.contains(&value) {
                    levels.push(value);
                }
            }
        }
    }
}

/// Strip emphasis markers so formatting like `**4810**` cannot split
/// digit sequences.
fn clean_markup(text: &str) -> String {
    text.replace(['*', '_', '`', '~'], "")
}
