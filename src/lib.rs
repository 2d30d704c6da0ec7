//! Reactive synchronization core for an ordered list of article records.
//!
//! Three pieces and the discipline binding them:
//!
//! - [`Article`] — a fixed-shape record (title, author, content, order) with
//!   an optional remote identity and placeholder defaults.
//! - [`ArticleList`] — an ordered, observable collection of records, sorted
//!   by an application-assigned `order` key and synchronized with an
//!   unordered [`RemoteStore`]. Every mutation emits a typed [`Event`] to
//!   ordered, synchronous subscribers.
//! - [`ArticleView`] / [`App`] — the per-record edit surface (an explicit
//!   display/editing state machine) and the application context that turns
//!   collection events into view lifecycle.
//!
//! Persistence is optimistic: local state and notifications settle before
//! the store call, and a failed write is surfaced to the caller without
//! rollback. The core is single-threaded and event-driven; the store's
//! async calls are the only suspension points.

mod app;
mod collection;
#[cfg(feature = "emitter")]
mod emitter;
mod error;
mod event;
mod record;
mod store;
mod view;

pub use app::{App, ViewPanel};
pub use collection::ArticleList;
pub use error::{ListError, StoreError};
pub use event::{Event, EventKind, HandlerId, Listeners};
pub use record::{
    Article, ArticleChanges, ArticleDraft, LocalKey, RecordId, DEFAULT_AUTHOR, DEFAULT_CONTENT,
    DEFAULT_TITLE,
};
pub use store::{ArticleBody, MemoryStore, RemoteStore, StoredArticle};
pub use view::{ArticleView, EditPayload, Field, KeyPress, Rendered, ViewState};

#[cfg(feature = "emitter")]
pub use emitter::EventRelay;

#[cfg(feature = "http")]
pub use store::HttpStore;

// Re-export the EventEmitter from the event_emitter_rs crate
#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;
