//! Compound `channel:event` keys.

use std::fmt;

use super::RelayError;

/// Loopback channel: published events never leave the process.
pub const LOCAL_CHANNEL: &str = "local";

/// Channel carrying the client's own connection lifecycle events.
pub const WS_CHANNEL: &str = "ws";

/// Channel the relay server listens on for control messages.
pub const RELAY_CHANNEL: &str = "wsRelay";

/// Control event asking the relay to forward a key to this client.
pub const REGISTER_EVENT: &str = "register";

/// Lifecycle event names published on [`WS_CHANNEL`].
pub const WS_OPEN: &str = "open";
pub const WS_ERROR: &str = "error";
pub const WS_CLOSE: &str = "close";

/// A channel/event pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventKey {
    pub channel: String,
    pub event: String,
}

impl EventKey {
    /// Create a key without validation.
    pub fn new(channel: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            event: event.into(),
        }
    }

    /// Create a key suitable for publishing.
    ///
    /// Both parts must be non-empty and the channel may not contain `:`,
    /// otherwise the receiving side would split the key differently.
    pub fn validated(channel: &str, event: &str) -> Result<Self, RelayError> {
        let reason = if channel.is_empty() {
            Some("channel is empty")
        } else if event.is_empty() {
            Some("event is empty")
        } else if channel.contains(':') {
            Some("channel contains ':'")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(RelayError::InvalidKey {
                channel: channel.to_string(),
                event: event.to_string(),
                reason,
            }),
            None => Ok(Self::new(channel, event)),
        }
    }

    /// Split a wire key on its first colon.
    ///
    /// Returns `None` when there is no colon.
    pub fn parse(raw: &str) -> Option<Self> {
        let (channel, event) = raw.split_once(':')?;
        Some(Self::new(channel, event))
    }

    /// Whether the relay server needs to know about this key.
    ///
    /// `local` and `ws` keys are only ever dispatched inside the process.
    pub fn is_remote(&self) -> bool {
        self.channel != LOCAL_CHANNEL && self.channel != WS_CHANNEL
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.channel, self.event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_on_first_colon() {
        let key = EventKey::parse("game:stat:feed").unwrap();
        assert_eq!(key.channel, "game");
        assert_eq!(key.event, "stat:feed");
    }

    #[test]
    fn test_parse_without_colon_is_none() {
        assert!(EventKey::parse("game").is_none());
    }

    #[test]
    fn test_display_round_trips_wire_form() {
        assert_eq!(EventKey::new("game", "update_state").to_string(), "game:update_state");
    }

    #[test]
    fn test_validated_rejects_bad_keys() {
        assert!(EventKey::validated("", "x").is_err());
        assert!(EventKey::validated("game", "").is_err());
        assert!(EventKey::validated("ga:me", "x").is_err());
        assert!(EventKey::validated("game", "goal_scored").is_ok());
    }

    #[test]
    fn test_reserved_channels_are_not_remote() {
        assert!(!EventKey::new(LOCAL_CHANNEL, "x").is_remote());
        assert!(!EventKey::new(WS_CHANNEL, WS_OPEN).is_remote());
        assert!(EventKey::new("game", "x").is_remote());
    }
}
