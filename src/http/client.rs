//! Outbound HTTP client used to reach the backend.

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tower_http::timeout::TimeoutBody;

use crate::config::TimeoutConfig;
use crate::resilience::{with_deadline, UpstreamError};

/// Pooled client with fixed write/read deadlines.
///
/// Clones share the same connection pool, so one instance can serve every
/// in-flight request.
#[derive(Clone)]
pub struct UpstreamClient {
    inner: Client<HttpConnector, Body>,
    timeouts: TimeoutConfig,
}

impl UpstreamClient {
    pub fn new(timeouts: TimeoutConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_nodelay(true);
        connector.set_keepalive(Some(Duration::from_secs(60)));
        connector.set_connect_timeout(Some(timeouts.write));

        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(64)
            .build(connector);

        Self { inner, timeouts }
    }

    pub fn timeouts(&self) -> TimeoutConfig {
        self.timeouts
    }

    /// Send one request and wait for the response head.
    ///
    /// The returned body fails once the backend goes quiet for longer than
    /// the read timeout.
    pub async fn send(
        &self,
        request: Request<Body>,
    ) -> Result<Response<TimeoutBody<Incoming>>, UpstreamError> {
        let response = with_deadline(
            self.timeouts.response_deadline(),
            self.inner.request(request),
        )
        .await?;

        let idle = self.timeouts.read;
        Ok(response.map(|body| TimeoutBody::new(idle, body)))
    }
}
