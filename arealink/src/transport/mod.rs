//! Socket transport layer.
//!
//! Everything above this module talks in text frames. The transport provides:
//!
//! - [`Connector`]: factory for [`Connection`]s (sink + stream of frames)
//! - [`WebSocketConnector`]: production connector over `tokio-tungstenite`
//! - [`MemoryConnector`]: in-process connector for tests
//! - [`ReconnectPolicy`]: what to do after a connection ends
//!
//! The crate-internal link supervisor in `link` keeps one connection alive
//! and reports its lifecycle to the relay client and the polygon exporter.

mod connector;
mod error;
pub(crate) mod link;
mod memory;
mod policy;
mod websocket;

pub use connector::{BoxFuture, Connection, Connector, FrameSink, FrameStream};
pub use error::TransportError;
pub use link::Outbound;
pub use memory::{MemoryConnector, MemoryPeer, MemoryServer};
pub use policy::{ReconnectPolicy, DEFAULT_RECONNECT_DELAY_SECS};
pub use websocket::WebSocketConnector;
