//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, serve loop)
//!     → middleware.rs (recovery, access log, compression, CORS)
//!     → forward.rs (rewrite target, strip hop-by-hop headers)
//!     → client.rs (pooled outbound call with deadline)
//!     → backend response streamed back up the pipeline
//! ```

pub mod client;
pub mod forward;
pub mod middleware;
pub mod server;

pub use client::UpstreamClient;
pub use server::{AppState, HttpServer};
