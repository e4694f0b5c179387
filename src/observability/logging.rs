//! Structured logging.
//!
//! Uses `tracing` with the fmt subscriber; every event carries a timestamp,
//! which makes the access log lines self-contained. `RUST_LOG` overrides the
//! default filter.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILTER: &str = "passthrough_proxy=info,tower_http=info";

/// Install the global subscriber. Safe to call more than once.
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
