//! Forwarding handler: the terminal stage of the pipeline.
//!
//! # Responsibilities
//! - Rewrite the target to `backend + original path/query`
//! - Copy method, headers and body (streamed) to the outbound request
//! - Copy status, headers and body (streamed) back to the caller
//! - Map upstream failures to gateway errors
//!
//! # Header Handling
//! Hop-by-hop headers (RFC 9110 §7.6.1) are removed in both directions,
//! together with any header listed in `Connection`. `Host` is dropped so the
//! client sets it from the backend authority.

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{CONNECTION, HOST},
        HeaderMap, HeaderName, Request, Uri, Version,
    },
    response::{IntoResponse, Response},
};

use crate::http::server::AppState;
use crate::resilience::UpstreamError;

const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Build the outbound URI by plain concatenation, with no path rewriting.
pub fn build_target(backend: &str, original: &Uri) -> Result<Uri, UpstreamError> {
    let path_and_query = original.path_and_query().map(|pq| pq.as_str()).unwrap_or("");
    let target = format!("{backend}{path_and_query}");
    target
        .parse()
        .map_err(|source| UpstreamError::InvalidTarget { target, source })
}

/// Remove hop-by-hop headers, including those nominated by `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let nominated: Vec<HeaderName> = headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in nominated {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}

/// Proxy one request to the configured backend.
pub async fn forward_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    match forward(&state, request).await {
        Ok(response) => response,
        Err(e) => {
            let status = e.status();
            tracing::error!(
                method = %method,
                uri = %uri,
                backend = %state.backend,
                status = status.as_u16(),
                error = %e,
                "Upstream error"
            );
            (status, "Upstream request failed").into_response()
        }
    }
}

async fn forward(state: &AppState, request: Request<Body>) -> Result<Response, UpstreamError> {
    let target = build_target(&state.backend, request.uri())?;
    let (parts, body) = request.into_parts();

    let mut outbound = Request::new(body);
    *outbound.method_mut() = parts.method;
    *outbound.uri_mut() = target;
    *outbound.version_mut() = Version::HTTP_11;
    *outbound.headers_mut() = parts.headers;
    strip_hop_by_hop(outbound.headers_mut());
    outbound.headers_mut().remove(HOST);

    tracing::debug!(method = %outbound.method(), target = %outbound.uri(), "Forwarding request");

    let response = state.client.send(outbound).await?;
    let (mut parts, body) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);

    Ok(Response::from_parts(parts, Body::new(body)))
}
