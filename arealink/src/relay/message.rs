//! Relay wire messages.
//!
//! Every frame in either direction is a JSON object
//! `{"event": "<channel>:<event>", "data": <any>}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::key::{EventKey, REGISTER_EVENT, RELAY_CHANNEL};

/// One relay frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayMessage {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

impl RelayMessage {
    /// A publish frame for `key`.
    pub fn publish(key: &EventKey, data: Value) -> Self {
        Self {
            event: key.to_string(),
            data,
        }
    }

    /// A registration frame asking the relay to forward `key`.
    pub fn register(key: &EventKey) -> Self {
        Self {
            event: format!("{}:{}", RELAY_CHANNEL, REGISTER_EVENT),
            data: Value::String(key.to_string()),
        }
    }

    /// Decode an inbound frame.
    ///
    /// Returns `None` for anything that is not a JSON object with a string
    /// `event` field. A missing `data` field decodes as `null`.
    pub fn decode(frame: &str) -> Option<Self> {
        let Value::Object(mut fields) = serde_json::from_str::<Value>(frame).ok()? else {
            return None;
        };
        let Some(Value::String(event)) = fields.remove("event") else {
            return None;
        };
        let data = fields.remove("data").unwrap_or(Value::Null);
        Some(Self { event, data })
    }

    /// Serialize to a text frame.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Split `event` into its key, if it has one.
    pub fn key(&self) -> Option<EventKey> {
        EventKey::parse(&self.event)
    }
}
