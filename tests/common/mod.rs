//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{body::Body, http::Request, Json, Router};
use passthrough_proxy::config::{ProxyConfig, TimeoutConfig};
use passthrough_proxy::{HttpServer, Shutdown};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;

/// Serve `app` on an ephemeral port.
pub async fn start_backend(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Start a backend that describes every request it receives as JSON:
/// `{"path", "method", "headers", "body"}`.
#[allow(dead_code)]
pub async fn start_echo_backend() -> SocketAddr {
    start_backend(Router::new().fallback(echo)).await
}

async fn echo(request: Request<Body>) -> Json<Value> {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    let headers: Map<String, Value> = parts
        .headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                Value::String(value.to_str().unwrap_or_default().to_string()),
            )
        })
        .collect();

    Json(json!({
        "path": parts.uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/"),
        "method": parts.method.as_str(),
        "headers": headers,
        "body": String::from_utf8_lossy(&body),
    }))
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// A running proxy; stops when dropped.
pub struct TestProxy {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

#[allow(dead_code)]
pub async fn start_proxy(backend: impl Into<String>) -> TestProxy {
    start_proxy_with(backend, TimeoutConfig::default()).await
}

pub async fn start_proxy_with(backend: impl Into<String>, timeouts: TimeoutConfig) -> TestProxy {
    let server = HttpServer::new(ProxyConfig::new(backend), timeouts);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestProxy { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap()
}
