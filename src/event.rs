//! Typed collection events and the subscription registry.
//!
//! Events carry snapshots of the records they describe, so handlers never
//! need to reach back into the collection mid-dispatch. Dispatch is
//! synchronous and in subscription order; the handler list is snapshotted
//! before each dispatch, so a handler may subscribe or unsubscribe from
//! inside a callback without corrupting the iteration.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::Serialize;

use crate::record::{Article, LocalKey};

/// A change to the collection or one of its members.
///
/// `Added`, `Removed` and `Reset` describe membership; `Changed` and
/// `Destroyed` describe a single record. A destroy emits `Destroyed`
/// followed by `Removed` for the same record.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// One new member, inserted at `position` in ascending-order iteration.
    Added { position: usize, article: Article },
    /// A member's attributes changed (one event per `set`/`save` call).
    Changed { article: Article },
    /// A member left the collection.
    Removed { key: LocalKey },
    /// A record was destroyed; its view should detach.
    Destroyed { article: Article },
    /// Full membership replacement, in ascending-order iteration order.
    Reset { articles: Vec<Article> },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Added { .. } => EventKind::Added,
            Event::Changed { .. } => EventKind::Changed,
            Event::Removed { .. } => EventKind::Removed,
            Event::Destroyed { .. } => EventKind::Destroyed,
            Event::Reset { .. } => EventKind::Reset,
        }
    }

    /// The key of the affected record, `None` for `Reset`.
    pub fn key(&self) -> Option<LocalKey> {
        match self {
            Event::Added { article, .. }
            | Event::Changed { article }
            | Event::Destroyed { article } => Some(article.key()),
            Event::Removed { key } => Some(*key),
            Event::Reset { .. } => None,
        }
    }
}

/// Discriminant of an [`Event`], for handlers that filter by kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Added,
    Changed,
    Removed,
    Destroyed,
    Reset,
}

impl EventKind {
    pub fn name(self) -> &'static str {
        match self {
            EventKind::Added => "added",
            EventKind::Changed => "changed",
            EventKind::Removed => "removed",
            EventKind::Destroyed => "destroyed",
            EventKind::Reset => "reset",
        }
    }
}

/// Handle returned by [`Listeners::subscribe`], used to unsubscribe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type Handler = Rc<dyn Fn(&Event)>;

/// Ordered, synchronous subscription registry.
///
/// Every subscriber sees every event (the catch-all stream); per-kind logic
/// filters on [`Event::kind`]. Subscribing during dispatch takes effect from
/// the next dispatch.
#[derive(Default)]
pub struct Listeners {
    next_id: Cell<u64>,
    handlers: RefCell<Vec<(HandlerId, Handler)>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, handler: impl Fn(&Event) + 'static) -> HandlerId {
        let id = HandlerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, Rc::new(handler)));
        id
    }

    /// Remove a handler. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.borrow().is_empty()
    }

    /// Dispatch an event to all current subscribers, in subscription order.
    pub fn emit(&self, event: &Event) {
        // Snapshot first: handlers may (un)subscribe reentrantly.
        let snapshot: Vec<Handler> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        for handler in snapshot {
            handler(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ArticleDraft;

    fn changed(n: u64) -> Event {
        let article = Article::from_draft(LocalKey(n), ArticleDraft::new(), n as i64);
        Event::Changed { article }
    }

    #[test]
    fn dispatch_in_subscription_order() {
        let listeners = Listeners::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let seen = Rc::clone(&seen);
            listeners.subscribe(move |_| seen.borrow_mut().push(tag));
        }

        listeners.emit(&changed(1));
        assert_eq!(*seen.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let listeners = Listeners::new();
        let count = Rc::new(Cell::new(0));

        let id = {
            let count = Rc::clone(&count);
            listeners.subscribe(move |_| count.set(count.get() + 1))
        };

        listeners.emit(&changed(1));
        assert!(listeners.unsubscribe(id));
        assert!(!listeners.unsubscribe(id));
        listeners.emit(&changed(2));

        assert_eq!(count.get(), 1);
        assert!(listeners.is_empty());
    }

    #[test]
    fn subscribing_during_dispatch_waits_for_next_dispatch() {
        let listeners = Rc::new(Listeners::new());
        let count = Rc::new(Cell::new(0));

        {
            let inner = Rc::clone(&listeners);
            let count = Rc::clone(&count);
            listeners.subscribe(move |_| {
                count.set(count.get() + 1);
                let count = Rc::clone(&count);
                inner.subscribe(move |_| count.set(count.get() + 10));
            });
        }

        listeners.emit(&changed(1));
        assert_eq!(count.get(), 1);

        listeners.emit(&changed(2));
        // original handler plus the one handler added during the first dispatch
        assert_eq!(count.get(), 12);
    }

    #[test]
    fn event_kind_and_key() {
        let event = changed(9);
        assert_eq!(event.kind(), EventKind::Changed);
        assert_eq!(event.key(), Some(LocalKey(9)));
        assert_eq!(event.kind().name(), "changed");

        let reset = Event::Reset { articles: vec![] };
        assert_eq!(reset.kind(), EventKind::Reset);
        assert_eq!(reset.key(), None);
    }
}
