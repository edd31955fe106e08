//! Reconnect policy for long-lived socket links.

use std::time::Duration;

/// Delay before reconnecting after a dropped or failed connection (3 seconds).
pub const DEFAULT_RECONNECT_DELAY_SECS: u64 = 3;

/// How a link behaves after its connection ends.
///
/// Attempts are counted per run of consecutive disconnects; a successful
/// connection resets the count.
#[derive(Clone, Debug, PartialEq)]
pub enum ReconnectPolicy {
    /// Stop after the first disconnect.
    Never,

    /// Wait a constant delay before every reconnect attempt.
    Fixed {
        /// Delay between the disconnect and the next attempt.
        delay: Duration,
        /// Give up after this many consecutive disconnects. `None` retries forever.
        max_attempts: Option<u32>,
    },
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::fixed(Duration::from_secs(DEFAULT_RECONNECT_DELAY_SECS))
    }
}

impl ReconnectPolicy {
    /// Fixed delay, unbounded retries.
    pub fn fixed(delay: Duration) -> Self {
        Self::Fixed {
            delay,
            max_attempts: None,
        }
    }

    /// Fixed delay, giving up after `max_attempts` consecutive disconnects.
    pub fn limited(delay: Duration, max_attempts: u32) -> Self {
        Self::Fixed {
            delay,
            max_attempts: Some(max_attempts),
        }
    }

    /// Delay before the reconnect that follows the `attempt`-th consecutive
    /// disconnect (1-based), or `None` to stop.
    pub fn delay_for_attempt(&self, attempt: u32) -> Option<Duration> {
        match self {
            Self::Never => None,
            Self::Fixed {
                delay,
                max_attempts,
            } => match max_attempts {
                Some(max) if attempt >= *max => None,
                _ => Some(*delay),
            },
        }
    }
}
