//! Channel/event publish-subscribe client for a WebSocket relay.
//!
//! The relay re-broadcasts `{"event": "<channel>:<event>", "data": ...}`
//! frames to every client that registered for that key. [`RelayClient`] keeps
//! one reconnecting connection open, registers keys on demand, and fans
//! inbound frames out to typed [`Listener`]s.
//!
//! # Example
//!
//! ```ignore
//! use arealink::relay::{RelayClient, RelayConfig};
//! use serde_json::Value;
//!
//! let client = RelayClient::websocket(RelayConfig::default().with_debug(true));
//! let _sub = client.subscribe("game", "update_state", |state: &Value| {
//!     println!("clock: {}", state["game"]["time_seconds"]);
//! });
//! client.connect();
//! ```

mod client;
mod config;
mod error;
mod key;
mod message;
mod registry;

pub use client::{ConnectionState, RelayClient, Subscription, Targets};
pub use config::{default_relay_url, RelayConfig, DEFAULT_RELAY_PORT};
pub use error::RelayError;
pub use key::{
    EventKey, LOCAL_CHANNEL, REGISTER_EVENT, RELAY_CHANNEL, WS_CHANNEL, WS_CLOSE, WS_ERROR,
    WS_OPEN,
};
pub use message::RelayMessage;
pub use registry::{Listener, ListenerId, SubscriptionRegistry};
