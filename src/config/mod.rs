//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config.json
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (backend present?)
//!     → missing/unusable: prompt operator, persist answer
//!     → ProxyConfig (immutable for the life of the process)
//!
//! command-line flags
//!     → ServerOptions (listener + outbound timeouts, never persisted)
//! ```
//!
//! # Design Decisions
//! - Acquisition happens once, before the runtime starts
//! - Persisting is best-effort; the in-memory value is always used

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_or_create, ConfigError};
pub use schema::{ListenerConfig, ProxyConfig, ServerOptions, TimeoutConfig};
