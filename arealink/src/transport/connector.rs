//! Connection factory abstraction.
//!
//! A [`Connector`] opens one text-frame [`Connection`] per call. The link
//! supervisor calls it again after every disconnect, so implementations must
//! be reusable. Production code uses [`super::WebSocketConnector`]; tests use
//! [`super::MemoryConnector`].

use std::future::Future;
use std::pin::Pin;

use futures::{Sink, Stream};

use super::TransportError;

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Outgoing half of a connection: accepts serialized text frames.
pub type FrameSink = Pin<Box<dyn Sink<String, Error = TransportError> + Send>>;

/// Incoming half of a connection: yields text frames until the peer closes.
pub type FrameStream = Pin<Box<dyn Stream<Item = Result<String, TransportError>> + Send>>;

/// An open, bidirectional text-frame connection.
pub struct Connection {
    pub sink: FrameSink,
    pub stream: FrameStream,
}

impl Connection {
    /// Build a connection from its two halves.
    pub fn new(sink: FrameSink, stream: FrameStream) -> Self {
        Self { sink, stream }
    }
}

/// Factory for connections to a single endpoint.
pub trait Connector: Send + Sync + 'static {
    /// Open a new connection.
    fn connect(&self) -> BoxFuture<'_, Result<Connection, TransportError>>;

    /// Human-readable endpoint description for logs.
    fn endpoint(&self) -> String;
}
