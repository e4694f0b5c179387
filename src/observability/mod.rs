//! Observability subsystem.
//!
//! Logging only: access lines come from the HTTP pipeline, everything else
//! from the subsystems themselves. Nothing is persisted.

pub mod logging;
