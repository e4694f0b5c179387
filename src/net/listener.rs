//! TCP listener binding.
//!
//! A bind failure is fatal: without the socket nothing can be served.

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::ListenerConfig;

/// Error type for listener operations.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("invalid bind address {address:?}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Bind to the configured address.
pub async fn bind(config: &ListenerConfig) -> Result<TcpListener, ListenerError> {
    let address: SocketAddr =
        config
            .bind_address
            .parse()
            .map_err(|source| ListenerError::InvalidAddress {
                address: config.bind_address.clone(),
                source,
            })?;

    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| ListenerError::Bind { address, source })?;

    let local_addr = listener
        .local_addr()
        .map_err(|source| ListenerError::Bind { address, source })?;

    tracing::info!(address = %local_addr, "Listener bound");
    Ok(listener)
}
