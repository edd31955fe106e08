//! Configuration for the polygon exporter.

use std::time::Duration;

use crate::transport::{ReconnectPolicy, DEFAULT_RECONNECT_DELAY_SECS};

/// Default export endpoint.
pub const DEFAULT_EXPORT_URL: &str = "ws://localhost:8080";

/// Configuration for a [`super::PolygonExporter`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// WebSocket URL polygon messages are streamed to.
    pub url: String,

    /// Delay between a disconnect and the next connection attempt.
    pub reconnect_delay: Duration,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_EXPORT_URL.to_string(),
            reconnect_delay: Duration::from_secs(DEFAULT_RECONNECT_DELAY_SECS),
        }
    }
}

impl ExportConfig {
    /// Create a configuration for the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the reconnect delay.
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Reconnect policy derived from this configuration.
    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy::fixed(self.reconnect_delay)
    }
}
