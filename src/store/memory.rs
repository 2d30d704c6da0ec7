//! In-process store backed by a hash map, for tests and examples.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::{ArticleBody, RemoteStore, StoredArticle};
use crate::error::StoreError;
use crate::record::RecordId;

/// An in-memory [`RemoteStore`].
///
/// Articles live in an unordered map keyed by an assigned id, mirroring the
/// "unordered bag keyed by opaque id" shape of a real endpoint. Clones share
/// the same storage, so a test can hold one handle while the collection owns
/// another.
#[derive(Clone, Default)]
pub struct MemoryStore {
    storage: Arc<RwLock<HashMap<String, StoredArticle>>>,
    next_id: Arc<AtomicU64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored articles.
    pub fn len(&self) -> Result<usize, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("len"))?;
        Ok(storage.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Look up one stored article by id.
    pub fn get(&self, id: &RecordId) -> Result<Option<StoredArticle>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("get"))?;
        Ok(storage.get(id.as_str()).cloned())
    }

    /// Insert an article directly, bypassing the CRUD surface. Test seeding.
    pub fn seed(&self, body: ArticleBody) -> Result<RecordId, StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("seed"))?;
        let id = self.assign_id();
        storage.insert(id.as_str().to_string(), stored(id.clone(), &body));
        Ok(id)
    }

    fn assign_id(&self) -> RecordId {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        RecordId::new(format!("a-{}", n))
    }
}

fn stored(id: RecordId, body: &ArticleBody) -> StoredArticle {
    StoredArticle {
        id,
        title: body.title.clone(),
        author: body.author.clone(),
        content: body.content.clone(),
        order: body.order,
    }
}

#[async_trait(?Send)]
impl RemoteStore for MemoryStore {
    async fn list(&self) -> Result<Vec<StoredArticle>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("list"))?;
        Ok(storage.values().cloned().collect())
    }

    async fn create(&self, body: &ArticleBody) -> Result<RecordId, StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("create"))?;
        let id = self.assign_id();
        storage.insert(id.as_str().to_string(), stored(id.clone(), body));
        Ok(id)
    }

    async fn update(&self, id: &RecordId, body: &ArticleBody) -> Result<(), StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("update"))?;
        match storage.get_mut(id.as_str()) {
            Some(existing) => {
                *existing = stored(id.clone(), body);
                Ok(())
            }
            None => Err(StoreError::Rejected { status: 404 }),
        }
    }

    async fn delete(&self, id: &RecordId) -> Result<(), StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("delete"))?;
        storage.remove(id.as_str());
        Ok(())
    }
}
