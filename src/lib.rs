//! Single-backend reverse proxy library.
//!
//! Every inbound request is forwarded, path and query untouched, to one
//! fixed backend. Responses pass back through recovery, access logging,
//! compression and permissive CORS.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod resilience;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
