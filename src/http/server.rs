//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the forwarding handler as the only endpoint
//! - Wire up the middleware pipeline
//! - Serve connections until shutdown is signalled

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::{ProxyConfig, TimeoutConfig};
use crate::http::client::UpstreamClient;
use crate::http::forward::forward_handler;
use crate::http::middleware;

/// Application state injected into handlers.
///
/// Read-only after startup; cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<str>,
    pub client: UpstreamClient,
}

/// HTTP server for the reverse proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server forwarding to `config.backend`.
    pub fn new(config: ProxyConfig, timeouts: TimeoutConfig) -> Self {
        let state = AppState {
            backend: Arc::from(config.backend.as_str()),
            client: UpstreamClient::new(timeouts),
        };

        let router = Self::build_router(state);
        Self { router, config }
    }

    fn build_router(state: AppState) -> Router {
        let router = Router::new()
            .fallback(forward_handler)
            .with_state(state);

        middleware::apply(router)
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backend = %self.config.backend,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
