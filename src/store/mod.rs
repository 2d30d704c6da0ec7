//! The remote store contract and its implementations.
//!
//! A [`RemoteStore`] is the external CRUD endpoint the collection syncs
//! against: an unordered bag of article representations keyed by an opaque
//! id. Ordering is a collection concern; stores may return members in any
//! order.
//!
//! Two implementations ship with the crate: [`MemoryStore`], an in-process
//! store for tests and examples, and [`HttpStore`] (feature `http`), a thin
//! JSON client for a real endpoint.

mod memory;

#[cfg(feature = "http")]
mod http;

pub use memory::MemoryStore;

#[cfg(feature = "http")]
pub use http::HttpStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::record::RecordId;

/// A persisted article as the store reports it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredArticle {
    pub id: RecordId,
    pub title: String,
    pub author: String,
    pub content: String,
    pub order: i64,
}

/// The attribute set pushed on create and update (everything but the id).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleBody {
    pub title: String,
    pub author: String,
    pub content: String,
    pub order: i64,
}

/// Asynchronous CRUD access to the remote collection of articles.
///
/// Futures are not required to be `Send`: the reactive core is
/// single-threaded and store calls are its only suspension points.
#[async_trait(?Send)]
pub trait RemoteStore {
    /// Fetch every stored article, in unspecified order.
    async fn list(&self) -> Result<Vec<StoredArticle>, StoreError>;

    /// Persist a new article; the store assigns and returns its id.
    async fn create(&self, body: &ArticleBody) -> Result<RecordId, StoreError>;

    /// Overwrite the attributes of an existing article.
    async fn update(&self, id: &RecordId, body: &ArticleBody) -> Result<(), StoreError>;

    /// Delete an article. Idempotent: deleting an absent id succeeds.
    async fn delete(&self, id: &RecordId) -> Result<(), StoreError>;
}
