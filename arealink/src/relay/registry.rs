//! Subscription registry: channel → event → ordered listeners.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::key::EventKey;

/// Receiver of relay event payloads.
///
/// Implemented for every `Fn(&Value) + Send + Sync` closure.
pub trait Listener: Send + Sync {
    /// Handle one event payload.
    fn notify(&self, data: &Value);
}

impl<F> Listener for F
where
    F: Fn(&Value) + Send + Sync,
{
    fn notify(&self, data: &Value) {
        self(data)
    }
}

/// Identity of one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

type ListenerList = Vec<(ListenerId, Arc<dyn Listener>)>;

/// Process-local record of which listeners want which keys.
///
/// Keys are never forgotten once added: removing the last listener of a key
/// leaves an empty list behind so that the relay is not asked to register the
/// same key twice.
#[derive(Default)]
pub struct SubscriptionRegistry {
    channels: HashMap<String, HashMap<String, ListenerList>>,
    next_id: u64,
}

impl SubscriptionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener for `key`.
    ///
    /// Returns the listener's id and whether `key` was seen for the first time.
    pub fn add(&mut self, key: &EventKey, listener: Arc<dyn Listener>) -> (ListenerId, bool) {
        self.next_id += 1;
        let id = ListenerId(self.next_id);

        let events = self.channels.entry(key.channel.clone()).or_default();
        let is_new = !events.contains_key(&key.event);
        events
            .entry(key.event.clone())
            .or_default()
            .push((id, listener));

        (id, is_new)
    }

    /// Remove one listener. Returns `false` if it was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        for events in self.channels.values_mut() {
            for listeners in events.values_mut() {
                if let Some(pos) = listeners.iter().position(|(lid, _)| *lid == id) {
                    listeners.remove(pos);
                    return true;
                }
            }
        }
        false
    }

    /// Remove every listener of exactly `channel:event`.
    ///
    /// Other events on the same channel are untouched. Returns how many
    /// listeners were removed.
    pub fn clear(&mut self, channel: &str, event: &str) -> usize {
        self.channels
            .get_mut(channel)
            .and_then(|events| events.get_mut(event))
            .map(|listeners| {
                let removed = listeners.len();
                listeners.clear();
                removed
            })
            .unwrap_or(0)
    }

    /// Snapshot of the listeners for `channel:event`, in registration order.
    pub fn listeners(&self, channel: &str, event: &str) -> Vec<Arc<dyn Listener>> {
        self.channels
            .get(channel)
            .and_then(|events| events.get(event))
            .map(|listeners| listeners.iter().map(|(_, l)| Arc::clone(l)).collect())
            .unwrap_or_default()
    }

    /// Whether `key` has ever been registered.
    pub fn contains(&self, key: &EventKey) -> bool {
        self.channels
            .get(&key.channel)
            .is_some_and(|events| events.contains_key(&key.event))
    }

    /// Number of live listeners for `key`.
    pub fn listener_count(&self, key: &EventKey) -> usize {
        self.channels
            .get(&key.channel)
            .and_then(|events| events.get(&key.event))
            .map_or(0, Vec::len)
    }

    /// Every key ever registered, sorted.
    pub fn keys(&self) -> Vec<EventKey> {
        let mut keys: Vec<EventKey> = self
            .channels
            .iter()
            .flat_map(|(channel, events)| events.keys().map(move |e| EventKey::new(channel, e)))
            .collect();
        keys.sort();
        keys
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn noop() -> Arc<dyn Listener> {
        Arc::new(|_: &Value| {})
    }

    #[test]
    fn test_first_add_reports_new_key() {
        let mut registry = SubscriptionRegistry::new();
        let key = EventKey::new("game", "update_state");

        let (a, first) = registry.add(&key, noop());
        let (b, second) = registry.add(&key, noop());

        assert!(first);
        assert!(!second);
        assert_ne!(a, b);
        assert_eq!(registry.listener_count(&key), 2);
    }

    #[test]
    fn test_listeners_in_registration_order() {
        let mut registry = SubscriptionRegistry::new();
        let key = EventKey::new("game", "goal_scored");
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

        for i in 0..3 {
            let order = Arc::clone(&order);
            registry.add(&key, Arc::new(move |_: &Value| order.lock().push(i)));
        }
        for l in registry.listeners("game", "goal_scored") {
            l.notify(&Value::Null);
        }

        assert_eq!(*order.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn test_clear_only_touches_named_event() {
        let mut registry = SubscriptionRegistry::new();
        let a = EventKey::new("game", "a");
        let b = EventKey::new("game", "b");
        registry.add(&a, noop());
        registry.add(&a, noop());
        registry.add(&b, noop());

        assert_eq!(registry.clear("game", "a"), 2);
        assert_eq!(registry.listener_count(&a), 0);
        assert_eq!(registry.listener_count(&b), 1);
        assert!(registry.contains(&a), "cleared key stays known");
        assert_eq!(registry.clear("game", "missing"), 0);
        assert_eq!(registry.clear("nope", "a"), 0);
    }

    #[test]
    fn test_remove_by_id() {
        let mut registry = SubscriptionRegistry::new();
        let key = EventKey::new("game", "x");
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let (keep, _) = registry.add(
            &key,
            Arc::new(move |_: &Value| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        let (drop_me, _) = registry.add(&key, noop());

        assert!(registry.remove(drop_me));
        assert!(!registry.remove(drop_me));
        assert_eq!(registry.listener_count(&key), 1);

        for l in registry.listeners("game", "x") {
            l.notify(&Value::Null);
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(registry.remove(keep));
    }

    #[test]
    fn test_keys_sorted() {
        let mut registry = SubscriptionRegistry::new();
        registry.add(&EventKey::new("ws", "open"), noop());
        registry.add(&EventKey::new("game", "b"), noop());
        registry.add(&EventKey::new("game", "a"), noop());

        let keys: Vec<String> = registry.keys().iter().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["game:a", "game:b", "ws:open"]);
    }
}
