//! Configuration validation.
//!
//! The backend is deliberately not parsed as a URL here: a malformed value
//! surfaces per request as a gateway error.

use crate::config::schema::ProxyConfig;

/// Returns true if the configuration can be served as-is.
pub fn is_usable(config: &ProxyConfig) -> bool {
    !config.backend.trim().is_empty()
}
