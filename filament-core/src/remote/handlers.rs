//! Event handler table.
//!
//! Handlers are inserted while components are created and looked up by the
//! connection's reader task. Entries are replaced but never removed.

use dashmap::DashMap;
use tracing::trace;

use super::protocol::InboundEvent;
use crate::render::Callback;

#[derive(Debug, Default)]
pub struct HandlerTable {
    handlers: DashMap<String, Callback>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `callback` under a correlation key, replacing any previous one.
    pub fn register(&self, key: String, callback: Callback) {
        trace!(%key, "registering event handler");
        self.handlers.insert(key, callback);
    }

    pub fn get(&self, key: &str) -> Option<Callback> {
        self.handlers.get(key).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.handlers.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run the handler matching `event`, returning whether one ran.
    ///
    /// The handler is cloned out first so it may register more handlers.
    pub fn dispatch(&self, event: &InboundEvent) -> bool {
        let key = event.correlation_key();
        match self.get(&key) {
            Some(callback) => {
                callback.call();
                true
            }
            None => {
                trace!(%key, "no handler for event");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ComponentId;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn dispatch_runs_matching_handler_once() {
        let table = HandlerTable::new();
        let clicks = Arc::new(AtomicUsize::new(0));
        let clicks_clone = clicks.clone();
        table.register(
            "1:click".into(),
            Callback::new(move || {
                clicks_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert!(table.dispatch(&InboundEvent::new(ComponentId::new(1), "click")));
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unmatched_events_are_ignored() {
        let table = HandlerTable::new();
        table.register("1:click".into(), Callback::new(|| {}));

        assert!(!table.dispatch(&InboundEvent::new(ComponentId::new(2), "click")));
        assert!(!table.dispatch(&InboundEvent::new(ComponentId::new(1), "close")));
    }

    #[test]
    fn handler_may_register_another_handler() {
        let table = Arc::new(HandlerTable::new());
        let inner = table.clone();
        table.register(
            "1:click".into(),
            Callback::new(move || inner.register("2:click".into(), Callback::new(|| {}))),
        );

        table.dispatch(&InboundEvent::new(ComponentId::new(1), "click"));
        assert!(table.contains("2:click"));
        assert_eq!(table.len(), 2);
    }
}
