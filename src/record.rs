//! The article record: a fixed-shape typed entity with placeholder defaults.
//!
//! Records carry two identities. `LocalKey` is process-local and assigned by
//! the owning collection the moment a record exists in memory; `RecordId` is
//! opaque, assigned by the remote store on first save, and absent before
//! then. Views and callers address records by `LocalKey` so an unsaved
//! record is as addressable as a persisted one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::store::{ArticleBody, StoredArticle};

/// Placeholder title for records created without one.
pub const DEFAULT_TITLE: &str = "(empty title)";
/// Placeholder author for records created without one.
pub const DEFAULT_AUTHOR: &str = "(empty author)";
/// Placeholder content for records created without any, or with an empty string.
pub const DEFAULT_CONTENT: &str = "(empty content)";

/// Process-local record identity, assigned by the collection.
///
/// Stable for the lifetime of the record, never reused within a collection,
/// and meaningless outside the process.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalKey(pub(crate) u64);

impl fmt::Display for LocalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque identifier assigned by the remote store once a record is persisted.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        RecordId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Attributes for a record that does not exist yet.
///
/// Absent fields fall back to the placeholder defaults; an absent `order`
/// is resolved by the collection via `next_order()`.
#[derive(Clone, Debug, Default)]
pub struct ArticleDraft {
    pub title: Option<String>,
    pub author: Option<String>,
    pub content: Option<String>,
    pub order: Option<i64>,
}

impl ArticleDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }
}

/// A partial update applied through `set` or `save`.
///
/// Only `Some` fields are written; the whole batch counts as a single
/// mutation and emits exactly one `Changed` event.
#[derive(Clone, Debug, Default)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub content: Option<String>,
    pub order: Option<i64>,
}

impl ArticleChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }
}

/// A single article record.
///
/// Fields are private; all mutation goes through the owning collection so
/// every change is observable and the content invariant holds: `content` is
/// never the empty string, whether at construction or after an update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Article {
    key: LocalKey,
    id: Option<RecordId>,
    title: String,
    author: String,
    content: String,
    order: i64,
}

impl Article {
    pub(crate) fn from_draft(key: LocalKey, draft: ArticleDraft, order: i64) -> Self {
        Article {
            key,
            id: None,
            title: draft.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            author: draft.author.unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            content: non_empty_content(draft.content),
            order,
        }
    }

    pub(crate) fn from_stored(key: LocalKey, stored: StoredArticle) -> Self {
        Article {
            key,
            id: Some(stored.id),
            title: stored.title,
            author: stored.author,
            content: non_empty_content(Some(stored.content)),
            order: stored.order,
        }
    }

    pub fn key(&self) -> LocalKey {
        self.key
    }

    /// Remote identity, `None` until the first successful save.
    pub fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn order(&self) -> i64 {
        self.order
    }

    pub(crate) fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    pub(crate) fn apply(&mut self, changes: ArticleChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(author) = changes.author {
            self.author = author;
        }
        if let Some(content) = changes.content {
            self.content = non_empty_content(Some(content));
        }
        if let Some(order) = changes.order {
            self.order = order;
        }
    }

    /// The wire representation pushed to the remote store on save.
    pub fn body(&self) -> ArticleBody {
        ArticleBody {
            title: self.title.clone(),
            author: self.author.clone(),
            content: self.content.clone(),
            order: self.order,
        }
    }
}

fn non_empty_content(content: Option<String>) -> String {
    match content {
        Some(content) if !content.is_empty() => content,
        _ => DEFAULT_CONTENT.to_string(),
    }
}
