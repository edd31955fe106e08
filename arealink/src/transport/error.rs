//! Transport error types.

use thiserror::Error;

/// Errors raised while opening or using a socket connection.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The WebSocket layer reported a failure.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The endpoint refused or could not be reached.
    #[error("Connection to {url} failed: {reason}")]
    Connect { url: String, reason: String },

    /// The peer side of the connection has gone away.
    #[error("Connection closed")]
    Closed,
}
