//! Shared test fixtures.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use article_sync::{ArticleBody, MemoryStore, RecordId, RemoteStore, StoreError, StoredArticle};

/// A store that can be told to fail its next operation.
///
/// Wraps a [`MemoryStore`]; clones share both the storage and the failure
/// switch, so a test can keep a handle while the collection owns another.
#[derive(Clone, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_next: Rc<RefCell<Option<StoreError>>>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next store call returns `err` instead of reaching storage.
    pub fn fail_next(&self, err: StoreError) {
        *self.fail_next.borrow_mut() = Some(err);
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn trip(&self) -> Result<(), StoreError> {
        match self.fail_next.borrow_mut().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait(?Send)]
impl RemoteStore for FlakyStore {
    async fn list(&self) -> Result<Vec<StoredArticle>, StoreError> {
        self.trip()?;
        self.inner.list().await
    }

    async fn create(&self, body: &ArticleBody) -> Result<RecordId, StoreError> {
        self.trip()?;
        self.inner.create(body).await
    }

    async fn update(&self, id: &RecordId, body: &ArticleBody) -> Result<(), StoreError> {
        self.trip()?;
        self.inner.update(id, body).await
    }

    async fn delete(&self, id: &RecordId) -> Result<(), StoreError> {
        self.trip()?;
        self.inner.delete(id).await
    }
}

/// Seed a store with one article, bypassing the CRUD surface.
pub fn seed(store: &MemoryStore, title: &str, author: &str, content: &str, order: i64) -> RecordId {
    store
        .seed(ArticleBody {
            title: title.to_string(),
            author: author.to_string(),
            content: content.to_string(),
            order,
        })
        .unwrap()
}
