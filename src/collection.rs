//! The ordered collection: local ordering over unordered remote storage.
//!
//! Articles are kept in ascending `order`, an application-assigned integer
//! sequence independent of the opaque ids the store keys them by. The
//! collection is the single owner of its members; every mutation goes
//! through it and emits exactly the events described in [`crate::event`].
//!
//! Persistence is optimistic. Local state and events are settled before the
//! store call is awaited, and a store failure propagates to the caller
//! without rolling anything back.

use tracing::{debug, warn};

use crate::error::{ListError, StoreError};
use crate::event::{Event, Listeners};
use crate::record::{Article, ArticleChanges, ArticleDraft, LocalKey, RecordId};
use crate::store::RemoteStore;

/// An ordered, observable collection of [`Article`]s backed by a store.
pub struct ArticleList<S> {
    store: S,
    items: Vec<Article>,
    listeners: Listeners,
    next_key: u64,
}

impl<S: RemoteStore> ArticleList<S> {
    pub fn new(store: S) -> Self {
        ArticleList {
            store,
            items: Vec::new(),
            listeners: Listeners::new(),
            next_key: 1,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The subscription registry. Every mutation kind is delivered to every
    /// subscriber; handlers filter on [`Event::kind`].
    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Members in ascending `order`.
    pub fn iter(&self) -> impl Iterator<Item = &Article> {
        self.items.iter()
    }

    pub fn get(&self, key: LocalKey) -> Option<&Article> {
        self.items.iter().find(|article| article.key() == key)
    }

    pub fn find_by_id(&self, id: &RecordId) -> Option<&Article> {
        self.items.iter().find(|article| article.id() == Some(id))
    }

    /// The order value the next created member receives: `1` when empty,
    /// else one past the greatest current order.
    pub fn next_order(&self) -> i64 {
        match self.items.last() {
            Some(last) => last.order() + 1,
            None => 1,
        }
    }

    fn allocate_key(&mut self) -> LocalKey {
        let key = LocalKey(self.next_key);
        self.next_key += 1;
        key
    }

    fn position(&self, key: LocalKey) -> Option<usize> {
        self.items.iter().position(|article| article.key() == key)
    }

    // Stable: a tie lands after existing members with the same order.
    fn insert_sorted(&mut self, article: Article) -> usize {
        let position = self
            .items
            .iter()
            .position(|existing| existing.order() > article.order())
            .unwrap_or(self.items.len());
        self.items.insert(position, article);
        position
    }

    /// Replace the whole membership with the store's current contents.
    ///
    /// Members are re-sorted ascending by `order` (the store's own order is
    /// unspecified) and a single `Reset` is emitted with the sorted
    /// snapshot. Returns the member count.
    pub async fn fetch(&mut self) -> Result<usize, StoreError> {
        let fetched = self.store.list().await?;

        let mut items = Vec::with_capacity(fetched.len());
        for stored in fetched {
            let key = self.allocate_key();
            items.push(Article::from_stored(key, stored));
        }
        // stable sort keeps the store's sequence for equal orders
        items.sort_by_key(Article::order);

        self.items = items;
        debug!(count = self.items.len(), "collection reset from store");
        self.listeners.emit(&Event::Reset {
            articles: self.items.clone(),
        });
        Ok(self.items.len())
    }

    /// Construct a member locally and persist it.
    ///
    /// An absent `order` in the draft resolves to [`next_order`]. The member
    /// is inserted and `Added` emitted before the store call; a successful
    /// create back-fills the assigned id and emits `Changed`. On failure the
    /// member stays and the error is returned.
    ///
    /// [`next_order`]: ArticleList::next_order
    pub async fn create(&mut self, draft: ArticleDraft) -> Result<LocalKey, ListError> {
        let order = draft.order.unwrap_or_else(|| self.next_order());
        let key = self.allocate_key();
        let article = Article::from_draft(key, draft, order);
        let body = article.body();

        let position = self.insert_sorted(article.clone());
        debug!(%key, order, position, "article added");
        self.listeners.emit(&Event::Added { position, article });

        match self.store.create(&body).await {
            Ok(id) => {
                self.assign_id(key, id);
                Ok(key)
            }
            Err(err) => {
                warn!(%key, %err, "article kept locally, create not persisted");
                Err(err.into())
            }
        }
    }

    /// Apply a local-only mutation. Emits exactly one `Changed` per call.
    pub fn set(&mut self, key: LocalKey, changes: ArticleChanges) -> Result<(), ListError> {
        let position = self.position(key).ok_or(ListError::UnknownRecord(key))?;
        let snapshot = {
            let article = &mut self.items[position];
            article.apply(changes);
            article.clone()
        };
        self.listeners.emit(&Event::Changed { article: snapshot });
        Ok(())
    }

    /// Apply a mutation and push the full record state to the store.
    ///
    /// Same `Changed` semantics as [`set`]; a record saved for the first
    /// time is created remotely, gets its id back-filled and emits a second
    /// `Changed` for the identity change. In-memory state is kept whether or
    /// not persistence succeeds.
    ///
    /// [`set`]: ArticleList::set
    pub async fn save(&mut self, key: LocalKey, changes: ArticleChanges) -> Result<(), ListError> {
        self.set(key, changes)?;

        let position = self.position(key).ok_or(ListError::UnknownRecord(key))?;
        let body = self.items[position].body();
        let id = self.items[position].id().cloned();

        match id {
            Some(id) => {
                if let Err(err) = self.store.update(&id, &body).await {
                    warn!(%key, %id, %err, "article kept locally, update not persisted");
                    return Err(err.into());
                }
            }
            None => match self.store.create(&body).await {
                Ok(id) => self.assign_id(key, id),
                Err(err) => {
                    warn!(%key, %err, "article kept locally, create not persisted");
                    return Err(err.into());
                }
            },
        }
        Ok(())
    }

    /// Destroy a record: drop it from the collection, emit `Destroyed` then
    /// `Removed`, and delete it remotely (skipped when never persisted).
    /// Remaining members keep their `order` values untouched.
    pub async fn destroy(&mut self, key: LocalKey) -> Result<(), ListError> {
        let position = self.position(key).ok_or(ListError::UnknownRecord(key))?;
        let article = self.items.remove(position);
        debug!(%key, "article destroyed");

        self.listeners.emit(&Event::Destroyed {
            article: article.clone(),
        });
        self.listeners.emit(&Event::Removed { key });

        if let Some(id) = article.id() {
            if let Err(err) = self.store.delete(id).await {
                warn!(%key, %id, %err, "article removed locally, delete not persisted");
                return Err(err.into());
            }
        }
        Ok(())
    }

    /// Alias for [`destroy`], matching the remove gesture on a view.
    ///
    /// [`destroy`]: ArticleList::destroy
    pub async fn clear(&mut self, key: LocalKey) -> Result<(), ListError> {
        self.destroy(key).await
    }

    fn assign_id(&mut self, key: LocalKey, id: RecordId) {
        let Some(position) = self.position(key) else {
            // destroyed while the create was in flight; nothing to back-fill
            return;
        };
        let snapshot = {
            let article = &mut self.items[position];
            article.set_id(id);
            article.clone()
        };
        self.listeners.emit(&Event::Changed { article: snapshot });
    }
}
