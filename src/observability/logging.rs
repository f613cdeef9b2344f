//! Structured logging.
//!
//! # Responsibilities
//! - Initialize a tracing subscriber for hosts that do not bring their own
//! - Honor `RUST_LOG`, falling back to the configured level

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Install a `fmt` subscriber filtered by `RUST_LOG`, or by `default_level`
/// when the variable is unset or invalid.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init(default_level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(default_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

/// [`init`] with the `[observability] log_level` from the config file.
pub fn init_from_config(config: &ObservabilityConfig) -> bool {
    init(&config.log_level)
}

fn default_directive(level: &str) -> String {
    format!("rate_gate={}", level.to_ascii_lowercase())
}
