//! Export error types.

use thiserror::Error;

/// Errors from [`super::PolygonExporter::export`].
///
/// The exporter logs each failure; the message is not retried.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The export socket is not open.
    #[error("Export socket not connected, polygon {id} not sent")]
    NotConnected { id: u64 },

    /// The message could not be serialized.
    #[error("Failed to encode polygon message: {0}")]
    Encode(#[from] serde_json::Error),

    /// The connection went away while sending.
    #[error("Transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),
}
