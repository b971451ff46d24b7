//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Configure log level from config, overridable at runtime via RUST_LOG
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Request ID is attached to handler events as a field, not a span

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directives used when RUST_LOG is not set.
pub fn default_directives(log_level: &str) -> String {
    format!("account_lookup={},tower_http={}", log_level, log_level)
}

/// Install the global subscriber. Safe to call more than once.
pub fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(log_level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
