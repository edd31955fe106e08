//! Polygon export over a dedicated socket.
//!
//! A map front-end streams every finalized or deleted polygon as
//! `{"type": ..., "data": ...}` JSON to a listening service (default
//! `ws://localhost:8080`). The socket reconnects on its own fixed delay and
//! is independent of the relay client.

mod config;
mod error;
mod exporter;
mod message;

pub use config::{ExportConfig, DEFAULT_EXPORT_URL};
pub use error::ExportError;
pub use exporter::PolygonExporter;
pub use message::{PolygonDeletion, PolygonMessage};
