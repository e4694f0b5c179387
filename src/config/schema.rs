//! Configuration schema definitions.
//!
//! Only [`ProxyConfig`] is persisted to disk. Listener and timeout settings
//! come from the command line and live for the lifetime of the process.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Persisted proxy configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProxyConfig {
    /// Base URL of the single upstream (e.g., "http://127.0.0.1:80").
    #[serde(default)]
    pub backend: String,
}

impl ProxyConfig {
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:80").
    pub bind_address: String,

    /// Runtime worker threads. `None` uses one per CPU.
    pub workers: Option<usize>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:80".to_string(),
            workers: None,
        }
    }
}

/// Outbound timeout configuration.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutConfig {
    /// Time allowed to connect and send the request.
    pub write: Duration,

    /// Time allowed for the backend to answer once the request is sent.
    pub read: Duration,
}

impl TimeoutConfig {
    /// Deadline for the response head, measured from dispatch.
    pub fn response_deadline(&self) -> Duration {
        self.write + self.read
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            write: Duration::from_secs(10),
            read: Duration::from_secs(10),
        }
    }
}

/// Process-level options that are never written to the config file.
#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    pub listener: ListenerConfig,
    pub timeouts: TimeoutConfig,
}
