//! Logging initialization with environment-based formatters.
//!
//! Production gets structured JSON for log aggregation; everything else
//! gets colorful human-readable output.

use crate::config::get_environment;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber based on the environment.
pub fn init_logging() {
    let env = get_environment();
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let is_production = matches!(env.as_str(), "production" | "prod");

    if is_production {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::io::stdout),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .init();
    }
}
