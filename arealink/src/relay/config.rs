//! Configuration for the relay client.

use std::collections::HashSet;
use std::time::Duration;

use crate::transport::{ReconnectPolicy, DEFAULT_RECONNECT_DELAY_SECS};

/// Default relay port used by the game's stats plugin.
pub const DEFAULT_RELAY_PORT: u16 = 49322;

/// Default relay endpoint.
pub fn default_relay_url() -> String {
    format!("ws://localhost:{}", DEFAULT_RELAY_PORT)
}

/// Configuration for a [`super::RelayClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct RelayConfig {
    /// WebSocket URL of the relay.
    pub url: String,

    /// Delay between a disconnect and the next connection attempt.
    pub reconnect_delay: Duration,

    /// Log every inbound event at info level.
    pub debug: bool,

    /// Keys (`channel:event`) excluded from debug logging.
    pub debug_filters: HashSet<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            url: default_relay_url(),
            reconnect_delay: Duration::from_secs(DEFAULT_RECONNECT_DELAY_SECS),
            debug: false,
            debug_filters: HashSet::new(),
        }
    }
}

impl RelayConfig {
    /// Create a configuration for the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Point at `ws://localhost:<port>`.
    pub fn with_port(mut self, port: u16) -> Self {
        self.url = format!("ws://localhost:{}", port);
        self
    }

    /// Set the reconnect delay.
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Enable or disable debug logging of inbound events.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Exclude a key from debug logging.
    pub fn with_debug_filter(mut self, key: impl Into<String>) -> Self {
        self.debug_filters.insert(key.into());
        self
    }

    /// Reconnect policy derived from this configuration.
    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy::fixed(self.reconnect_delay)
    }

    /// Whether an inbound key should be written to the debug log.
    pub fn should_log(&self, key: &str) -> bool {
        self.debug && !self.debug_filters.contains(key)
    }
}
