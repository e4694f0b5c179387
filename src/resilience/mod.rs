//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to backend:
//!     → timeouts.rs (enforce response deadline)
//!     → On failure: classify into 502 / 504
//! ```
//!
//! Forwarding is single-attempt: there are no retries and no circuit breaker.

pub mod timeouts;

pub use timeouts::{with_deadline, UpstreamError};
