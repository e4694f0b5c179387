//! Request/response pipeline wrapped around the forwarding handler.
//!
//! # Layer Order (outermost first)
//! ```text
//! recovery     CatchPanicLayer → 500 (with CORS headers)
//! access log   TraceLayer (method, path, status, latency)
//! compression  CompressionLayer (fastest level, Accept-Encoding driven)
//! cors         fixed Access-Control-* headers + preflight answers
//! handler      forward_handler
//! ```

use std::any::Any;
use std::time::Duration;

use axum::{
    http::{
        header::{
            ACCEPT, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, ORIGIN,
        },
        HeaderMap, HeaderValue, Method, Request, Response, StatusCode,
    },
    Router,
};
use bytes::Bytes;
use http_body_util::Full;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::{CompressionLayer, CompressionLevel},
    cors::{Any as AnyOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::{MakeSpan, OnResponse, TraceLayer},
};
use tracing::Span;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET,POST,HEAD,PUT,DELETE,PATCH";
pub const ALLOW_HEADERS: &str = "Origin, Content-Type, Accept";

/// Wrap `router` in the full pipeline.
pub fn apply(router: Router) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(CatchPanicLayer::custom(recover))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(AccessLog)
                    .on_response(AccessLog),
            )
            .layer(CompressionLayer::new().quality(CompressionLevel::Fastest))
            .layer(SetResponseHeaderLayer::overriding(
                ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static(ALLOW_ORIGIN),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOW_METHODS),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(ALLOW_HEADERS),
            ))
            .layer(preflight()),
    )
}

/// Insert the permissive CORS headers.
pub fn insert_cors_headers(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static(ALLOW_ORIGIN));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
}

/// Answers every `OPTIONS` request at the proxy.
fn preflight() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::HEAD,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([ORIGIN, CONTENT_TYPE, ACCEPT])
}

fn recover(panic: Box<dyn Any + Send + 'static>) -> Response<Full<Bytes>> {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = %detail, "Request handler panicked");

    let mut response = Response::new(Full::from("Internal Server Error"));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    insert_cors_headers(response.headers_mut());
    response
}

/// Access log hooks for [`TraceLayer`].
#[derive(Clone, Copy, Debug, Default)]
pub struct AccessLog;

impl<B> MakeSpan<B> for AccessLog {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let path = request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        tracing::info_span!("request", method = %request.method(), path = %path)
    }
}

impl<B> OnResponse<B> for AccessLog {
    fn on_response(self, response: &Response<B>, latency: Duration, _span: &Span) {
        tracing::info!(
            status = response.status().as_u16(),
            latency_ms = latency.as_millis() as u64,
            "Request completed"
        );
    }
}
