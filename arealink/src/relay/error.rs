//! Relay client error types.

use thiserror::Error;

use crate::transport::TransportError;

/// Errors reported by [`super::RelayClient::publish`].
///
/// These are informational: the client has already logged the failure and
/// dropped the message by the time the caller sees one.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Channel or event is not a usable identifier.
    #[error("Invalid key '{channel}:{event}': {reason}")]
    InvalidKey {
        channel: String,
        event: String,
        reason: &'static str,
    },

    /// No open connection to send on.
    #[error("Not connected, message for '{key}' dropped")]
    NotConnected { key: String },

    /// The payload could not be serialized.
    #[error("Failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    /// The connection rejected the frame.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}
