//! Environment-based configuration.
//!
//! Binaries call `dotenvy::dotenv()` before reading anything here; the
//! library itself only ever receives an explicit [`EngineConfig`], never
//! ambient state.

use std::env;
use std::str::FromStr;

/// Deployment environment name, defaults to "sandbox".
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

/// Postgres connection string for the signal store.
pub fn get_database_url() -> String {
    env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://postgres@localhost:5432/sigmill".to_string())
}

/// Tunables consumed by the extraction and lifecycle engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Uppercase instrument names accepted by the extractor.
    pub allowed_symbols: Vec<String>,
    /// Maximum stop-loss distance in price units.
    pub max_sl_distance: f64,
    /// Per-unit price adjustment applied after extraction.
    pub price_adjustment: f64,
    /// Window for ignoring re-broadcasts of the same signal content.
    pub duplicate_window_secs: i64,
    /// Age after which unresolved signals expire.
    pub expiry_window_secs: i64,
    /// Cadence of the expiry sweep.
    pub sweep_interval_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            allowed_symbols: vec!["XAUUSD".to_string(), "GOLD".to_string()],
            max_sl_distance: 15.0,
            price_adjustment: 0.50,
            duplicate_window_secs: 5,
            expiry_window_secs: 3600,
            sweep_interval_secs: 1,
        }
    }
}

impl EngineConfig {
    /// Read configuration from the environment, falling back to defaults
    /// for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            allowed_symbols: env::var("ALLOWED_SYMBOLS")
                .ok()
                .map(|raw| parse_symbol_list(&raw))
                .filter(|list| !list.is_empty())
                .unwrap_or(defaults.allowed_symbols),
            max_sl_distance: env_parse("MAX_SL_DISTANCE", defaults.max_sl_distance),
            price_adjustment: env_parse("PRICE_ADJUSTMENT", defaults.price_adjustment),
            duplicate_window_secs: env_parse(
                "DUPLICATE_WINDOW_SECONDS",
                defaults.duplicate_window_secs,
            ),
            expiry_window_secs: env_parse("EXPIRY_WINDOW_SECONDS", defaults.expiry_window_secs),
            sweep_interval_secs: env_parse("SWEEP_INTERVAL_SECONDS", defaults.sweep_interval_secs),
        }
    }
}

/// Comma-separated symbol list, uppercased, empty entries dropped.
pub fn parse_symbol_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn env_parse<T: FromStr + Copy>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
