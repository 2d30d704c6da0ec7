//! Bridge from typed collection events to a string-keyed `EventEmitter`.
//!
//! Consumers that don't want to link against the typed [`Event`] enum (or
//! that fan events out to loosely-coupled listeners) can attach a relay:
//! every event is re-emitted on an [`EventEmitter`] under its kind name
//! (`"added"`, `"changed"`, ...) with the full event serialized to JSON as
//! the payload.

use std::cell::RefCell;
use std::rc::Rc;

use event_emitter_rs::EventEmitter;
use tracing::warn;

use crate::event::{Event, EventKind, HandlerId, Listeners};

/// Forwards typed events onto an `event_emitter_rs::EventEmitter`.
///
/// ## Example
///
/// ```ignore
/// let relay = EventRelay::new();
/// relay.on(EventKind::Added, |payload: String| {
///     println!("article added: {}", payload);
/// });
/// relay.attach(list.listeners());
/// ```
#[derive(Clone)]
pub struct EventRelay {
    emitter: Rc<RefCell<EventEmitter>>,
}

impl Default for EventRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl EventRelay {
    pub fn new() -> Self {
        EventRelay {
            emitter: Rc::new(RefCell::new(EventEmitter::new())),
        }
    }

    /// Subscribe the relay to a collection's listeners. The returned id
    /// unsubscribes the relay, not its own listeners.
    pub fn attach(&self, listeners: &Listeners) -> HandlerId {
        let emitter = Rc::clone(&self.emitter);
        listeners.subscribe(move |event: &Event| match serde_json::to_string(event) {
            Ok(payload) => {
                emitter.borrow_mut().emit(event.kind().name(), payload);
            }
            Err(err) => {
                warn!(%err, "event not relayed, serialization failed");
            }
        })
    }

    /// Register a listener for one event kind. The payload is the JSON
    /// serialization of the full event.
    pub fn on<F>(&self, kind: EventKind, listener: F) -> String
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.emitter.borrow_mut().on(kind.name(), listener)
    }

    /// Remove a listener registered with [`on`](EventRelay::on).
    pub fn remove_listener(&self, listener_id: &str) -> Option<String> {
        self.emitter.borrow_mut().remove_listener(listener_id)
    }
}
