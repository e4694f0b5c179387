//! Timeout enforcement and upstream failure classification.
//!
//! # Responsibilities
//! - Bound every backend call with a deadline
//! - Map upstream failures onto gateway status codes
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timed-out requests (including connect timeouts) return 504 Gateway Timeout
//! - Every other upstream failure returns 502 Bad Gateway

use std::error::Error as StdError;
use std::future::Future;
use std::io;
use std::time::Duration;

use axum::http::{uri::InvalidUri, StatusCode};

/// Failure of a single forwarded request.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("invalid upstream target {target:?}: {source}")]
    InvalidTarget {
        target: String,
        #[source]
        source: InvalidUri,
    },
    #[error("upstream request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),
    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),
}

impl UpstreamError {
    /// Status code returned to the caller for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            UpstreamError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            UpstreamError::Transport(e) if caused_by_timeout(e) => StatusCode::GATEWAY_TIMEOUT,
            UpstreamError::InvalidTarget { .. } | UpstreamError::Transport(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

/// Run `call`, failing with [`UpstreamError::Timeout`] once `deadline` elapses.
///
/// The inner future is dropped on timeout, which closes its connection.
pub async fn with_deadline<F, T, E>(deadline: Duration, call: F) -> Result<T, UpstreamError>
where
    F: Future<Output = Result<T, E>>,
    E: Into<UpstreamError>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result.map_err(Into::into),
        Err(_) => Err(UpstreamError::Timeout(deadline)),
    }
}

fn caused_by_timeout(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::TimedOut {
                return true;
            }
        }
        current = e.source();
    }
    false
}
