//! Error types for the WebSocket transport

use relay_domain::DomainError;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors raised while establishing or running a gateway connection.
///
/// None of these reach callers of the transport: they end the current
/// connection attempt, are logged and reported as `last_error`, and the
/// reconnect policy takes over.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] DomainError),

    #[error("Bearer token is not a valid header value")]
    InvalidToken,

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),
}
