//! The relay client.
//!
//! # Lifecycle
//!
//! ```text
//! new() ──► Disconnected ──connect()──► Connecting ──► Connected
//!                ▲                          │              │
//!                └──── reconnect delay ◄────┴── error/close┘
//! ```
//!
//! Lifecycle transitions are published locally on the `ws` channel
//! (`ws:open`, `ws:error`, `ws:close`) so callers observe them with the same
//! [`RelayClient::subscribe`] call they use for relay events.
//!
//! # Registration ordering
//!
//! The first listener for a remote key triggers one
//! `{"event":"wsRelay:register","data":"<key>"}` frame. While disconnected
//! these keys wait in a pending queue; on the next open the queue is flushed
//! in request order and then `ws:open` listeners run, already able to
//! publish.
//!
//! # Locking
//!
//! Registry and link state are separate mutexes, always taken in that order.
//! Listeners run with no lock held, so they may subscribe or publish.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::key::{EventKey, LOCAL_CHANNEL, WS_CHANNEL, WS_CLOSE, WS_ERROR, WS_OPEN};
use super::message::RelayMessage;
use super::registry::{Listener, ListenerId, SubscriptionRegistry};
use super::{RelayConfig, RelayError};
use crate::transport::link::{spawn_link, LinkHandler};
use crate::transport::{Connector, Outbound, TransportError, WebSocketConnector};

/// Connection state of a [`RelayClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// One or more channel or event names.
///
/// Lets [`RelayClient::subscribe`] take either a single name or a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Targets(Vec<String>);

impl Targets {
    fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<&str> for Targets {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for Targets {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl From<&String> for Targets {
    fn from(name: &String) -> Self {
        Self(vec![name.clone()])
    }
}

impl From<Vec<String>> for Targets {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl From<Vec<&str>> for Targets {
    fn from(names: Vec<&str>) -> Self {
        Self(names.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Targets {
    fn from(names: &[&str]) -> Self {
        Self(names.iter().map(|s| s.to_string()).collect())
    }
}

impl From<&[String]> for Targets {
    fn from(names: &[String]) -> Self {
        Self(names.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for Targets {
    fn from(names: [&str; N]) -> Self {
        Self(names.iter().map(|s| s.to_string()).collect())
    }
}

/// Handle to the listeners registered by one [`RelayClient::subscribe`] call.
///
/// Dropping the handle does not unsubscribe.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "keep the handle to be able to unsubscribe"]
pub struct Subscription {
    ids: Vec<ListenerId>,
}

impl Subscription {
    /// Listener ids, one per channel × event pair.
    pub fn ids(&self) -> &[ListenerId] {
        &self.ids
    }
}

struct LinkState {
    state: ConnectionState,
    outbound: Option<Outbound>,
    pending: Vec<EventKey>,
}

struct Shared {
    config: RelayConfig,
    registry: Mutex<SubscriptionRegistry>,
    link: Mutex<LinkState>,
    state_tx: watch::Sender<ConnectionState>,
}

impl Shared {
    fn dispatch(&self, channel: &str, event: &str, data: &Value) -> usize {
        let listeners = self.registry.lock().listeners(channel, event);
        for listener in &listeners {
            listener.notify(data);
        }
        listeners.len()
    }

    fn set_state(&self, link: &mut LinkState, state: ConnectionState) {
        link.state = state;
        self.state_tx.send_replace(state);
    }

    /// Send a registration now or queue it for the next open.
    fn request_registration(&self, key: EventKey) {
        let mut link = self.link.lock();
        if link.state == ConnectionState::Connected {
            if let Some(outbound) = &link.outbound {
                match send_frame(outbound, &RelayMessage::register(&key)) {
                    Ok(()) => {
                        debug!(key = %key, "Registered with relay");
                        return;
                    }
                    Err(e) => debug!(key = %key, error = %e, "Registration deferred"),
                }
            }
        }
        debug!(key = %key, "Registration queued");
        link.pending.push(key);
    }

    fn handle_frame(&self, frame: &str) {
        let Some(message) = RelayMessage::decode(frame) else {
            debug!(len = frame.len(), "Discarding frame without event");
            return;
        };
        let Some(key) = message.key() else {
            debug!(event = %message.event, "Discarding frame with malformed event");
            return;
        };

        if self.config.should_log(&message.event) {
            info!(channel = %key.channel, event = %key.event, data = %message.data, "Relay event");
        }

        self.dispatch(&key.channel, &key.event, &message.data);
    }
}

impl LinkHandler for Shared {
    fn on_connecting(&self) {
        let mut link = self.link.lock();
        self.set_state(&mut link, ConnectionState::Connecting);
    }

    fn on_open(&self, outbound: Outbound) {
        {
            let mut link = self.link.lock();
            self.set_state(&mut link, ConnectionState::Connected);

            let pending = std::mem::take(&mut link.pending);
            if !pending.is_empty() {
                info!(count = pending.len(), "Flushing queued registrations");
            }
            for key in pending {
                if let Err(e) = send_frame(&outbound, &RelayMessage::register(&key)) {
                    warn!(key = %key, error = %e, "Failed to flush registration");
                }
            }
            link.outbound = Some(outbound);
        }

        // Listeners see a usable connection: publish and subscribe go straight out.
        self.dispatch(WS_CHANNEL, WS_OPEN, &Value::Null);
    }

    fn on_frame(&self, frame: String) {
        self.handle_frame(&frame);
    }

    fn on_error(&self, error: &TransportError) {
        {
            let mut link = self.link.lock();
            link.outbound = None;
            self.set_state(&mut link, ConnectionState::Disconnected);
        }
        self.dispatch(WS_CHANNEL, WS_ERROR, &Value::String(error.to_string()));
    }

    fn on_close(&self) {
        {
            let mut link = self.link.lock();
            link.outbound = None;
            self.set_state(&mut link, ConnectionState::Disconnected);
        }
        self.dispatch(WS_CHANNEL, WS_CLOSE, &Value::Null);
    }
}

fn send_frame(outbound: &Outbound, message: &RelayMessage) -> Result<(), RelayError> {
    let frame = message.encode()?;
    outbound.send(frame)?;
    Ok(())
}

/// Publish/subscribe client for a `channel:event` relay.
///
/// Must be connected from within a Tokio runtime. Dropping the client stops
/// its connection task.
pub struct RelayClient {
    shared: Arc<Shared>,
    connector: Arc<dyn Connector>,
    cancel: Mutex<CancellationToken>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl RelayClient {
    /// Create a disconnected client using `connector` for every attempt.
    pub fn new(connector: Arc<dyn Connector>, config: RelayConfig) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        let shared = Arc::new(Shared {
            config,
            registry: Mutex::new(SubscriptionRegistry::new()),
            link: Mutex::new(LinkState {
                state: ConnectionState::Disconnected,
                outbound: None,
                pending: Vec::new(),
            }),
            state_tx,
        });

        Self {
            shared,
            connector,
            cancel: Mutex::new(CancellationToken::new()),
            task: Mutex::new(None),
        }
    }

    /// Create a WebSocket client for `config.url`.
    pub fn websocket(config: RelayConfig) -> Self {
        let connector = Arc::new(WebSocketConnector::new(config.url.clone()));
        Self::new(connector, config)
    }

    /// Start connecting. Calling this again while running has no effect.
    ///
    /// A client that was shut down may be connected again.
    pub fn connect(&self) {
        let mut task = self.task.lock();
        if task.is_some() {
            return;
        }
        let cancel = {
            let mut cancel = self.cancel.lock();
            if cancel.is_cancelled() {
                *cancel = CancellationToken::new();
            }
            cancel.clone()
        };
        info!(endpoint = %self.connector.endpoint(), "Starting relay client");
        *task = Some(spawn_link(
            Arc::clone(&self.connector),
            self.shared.config.reconnect_policy(),
            Arc::clone(&self.shared),
            cancel,
        ));
    }

    /// Stop the connection task and wait for it to exit.
    ///
    /// A final `ws:close` is published if a connection was open or pending.
    pub async fn shutdown(&self) {
        self.cancel.lock().cancel();
        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!(error = %e, "Relay task ended abnormally");
            }
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.shared.link.lock().state
    }

    /// Whether the connection is open.
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Wait until the client reaches `state`.
    pub async fn wait_for_state(&self, state: ConnectionState) {
        let mut rx = self.shared.state_tx.subscribe();
        // The sender lives in `shared`, which outlives this borrow.
        let _ = rx.wait_for(|current| *current == state).await;
    }

    /// Register `listener` for every pair in `channels` × `events`.
    ///
    /// The relay is asked to forward each remote pair the first time any
    /// listener subscribes to it. Pairs that could not round-trip through the
    /// wire key (empty parts, `:` in the channel) are logged and skipped.
    pub fn subscribe<L>(
        &self,
        channels: impl Into<Targets>,
        events: impl Into<Targets>,
        listener: L,
    ) -> Subscription
    where
        L: Listener + 'static,
    {
        let listener: Arc<dyn Listener> = Arc::new(listener);
        let channels = channels.into();
        let events = events.into();
        let mut ids = Vec::new();

        let mut registry = self.shared.registry.lock();
        for channel in channels.iter() {
            for event in events.iter() {
                let key = match EventKey::validated(channel, event) {
                    Ok(key) => key,
                    Err(e) => {
                        warn!(error = %e, "Subscription skipped");
                        continue;
                    }
                };
                let (id, is_new) = registry.add(&key, Arc::clone(&listener));
                ids.push(id);
                if is_new && key.is_remote() {
                    self.shared.request_registration(key);
                }
            }
        }

        Subscription { ids }
    }

    /// Remove the listeners added by `subscription`.
    ///
    /// The relay keeps forwarding the keys; they are simply no longer
    /// delivered to these listeners. Returns how many were removed.
    pub fn unsubscribe(&self, subscription: &Subscription) -> usize {
        let mut registry = self.shared.registry.lock();
        subscription
            .ids
            .iter()
            .filter(|id| registry.remove(**id))
            .count()
    }

    /// Remove every listener of exactly `channel:event`.
    pub fn clear_event_callbacks(&self, channel: &str, event: &str) -> usize {
        let removed = self.shared.registry.lock().clear(channel, event);
        if removed > 0 {
            debug!(channel, event, removed, "Cleared listeners");
        }
        removed
    }

    /// Publish `data` on `channel:event`.
    ///
    /// `local` events are delivered synchronously to this client's own
    /// listeners and never touch the network. Failures are logged and the
    /// message is dropped; the returned error is for callers that care.
    pub fn publish(&self, channel: &str, event: &str, data: Value) -> Result<(), RelayError> {
        let key = EventKey::validated(channel, event).inspect_err(|e| {
            warn!(error = %e, "Publish rejected");
        })?;

        if key.channel == LOCAL_CHANNEL {
            self.shared.dispatch(&key.channel, &key.event, &data);
            return Ok(());
        }

        let link = self.shared.link.lock();
        let outbound = match (&link.outbound, link.state) {
            (Some(outbound), ConnectionState::Connected) => outbound,
            _ => {
                let err = RelayError::NotConnected {
                    key: key.to_string(),
                };
                warn!(error = %err, "Publish dropped");
                return Err(err);
            }
        };

        send_frame(outbound, &RelayMessage::publish(&key, data)).inspect_err(|e| {
            warn!(key = %key, error = %e, "Publish failed, message dropped");
        })
    }

    /// Registrations waiting for the next open, in request order.
    pub fn pending_registrations(&self) -> Vec<EventKey> {
        self.shared.link.lock().pending.clone()
    }

    /// Every key any listener has ever subscribed to.
    pub fn subscribed_keys(&self) -> Vec<EventKey> {
        self.shared.registry.lock().keys()
    }

    /// The endpoint this client connects to.
    pub fn endpoint(&self) -> String {
        self.connector.endpoint()
    }
}

impl Drop for RelayClient {
    fn drop(&mut self) {
        self.cancel.get_mut().cancel();
    }
}
