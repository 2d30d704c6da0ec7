//! The application context: one collection, one view panel, one entry form.
//!
//! `App` replaces the usual hidden global with an explicit object built once
//! at startup. Construction wires the panel to the collection's events and
//! issues the initial fetch; afterwards every user gesture is a method call
//! that mutates the collection, whose events in turn drive view lifecycle.

use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::collection::ArticleList;
use crate::error::{ListError, StoreError};
use crate::event::{Event, HandlerId};
use crate::record::{ArticleDraft, LocalKey};
use crate::store::RemoteStore;
use crate::view::{ArticleView, EditPayload, Field, KeyPress};

/// The set of live views, kept in display order.
///
/// Maintained purely from collection events: one view appears per `Added`,
/// the whole set is rebuilt on `Reset`, and a `Destroyed` detaches exactly
/// the affected view. `refreshes` counts every event of any kind — the
/// coarse hook a chrome layer (item counts etc.) would repaint from.
#[derive(Default)]
pub struct ViewPanel {
    views: HashMap<LocalKey, ArticleView>,
    display_order: Vec<LocalKey>,
    refreshes: u64,
}

impl ViewPanel {
    pub fn len(&self) -> usize {
        self.display_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.display_order.is_empty()
    }

    /// Keys in display order.
    pub fn keys(&self) -> &[LocalKey] {
        &self.display_order
    }

    pub fn get(&self, key: LocalKey) -> Option<&ArticleView> {
        self.views.get(&key)
    }

    /// Views in display order.
    pub fn iter(&self) -> impl Iterator<Item = &ArticleView> {
        self.display_order.iter().filter_map(|key| self.views.get(key))
    }

    /// Count of events seen since construction (the catch-all refresh hook).
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }

    fn get_mut(&mut self, key: LocalKey) -> Option<&mut ArticleView> {
        self.views.get_mut(&key)
    }

    fn apply(&mut self, event: &Event) {
        self.refreshes += 1;
        match event {
            Event::Added { position, article } => {
                let position = (*position).min(self.display_order.len());
                self.display_order.insert(position, article.key());
                self.views.insert(article.key(), ArticleView::new(article));
            }
            Event::Reset { articles } => {
                self.views.clear();
                self.display_order.clear();
                for article in articles {
                    self.display_order.push(article.key());
                    self.views.insert(article.key(), ArticleView::new(article));
                }
            }
            Event::Changed { article } => {
                if let Some(view) = self.views.get_mut(&article.key()) {
                    view.render(article);
                }
            }
            Event::Destroyed { article } => {
                self.views.remove(&article.key());
                self.display_order.retain(|key| *key != article.key());
            }
            // membership bookkeeping already done on Destroyed
            Event::Removed { .. } => {}
        }
    }
}

/// Transient values of the three "new article" inputs.
#[derive(Default)]
struct EntryForm {
    title: String,
    author: String,
    content: String,
}

impl EntryForm {
    fn field(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Author => &self.author,
            Field::Content => &self.content,
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.title,
            Field::Author => &mut self.author,
            Field::Content => &mut self.content,
        }
    }

    // Reads and clears all three inputs in one step; the form is empty
    // again before the create is persisted.
    fn drain(&mut self) -> ArticleDraft {
        ArticleDraft::new()
            .title(std::mem::take(&mut self.title))
            .author(std::mem::take(&mut self.author))
            .content(std::mem::take(&mut self.content))
    }
}

/// Top-level controller composing the collection and the view panel.
pub struct App<S: RemoteStore> {
    articles: ArticleList<S>,
    panel: Rc<RefCell<ViewPanel>>,
    entry: EntryForm,
    subscription: HandlerId,
}

impl<S: RemoteStore> App<S> {
    /// Build the app: subscribe the panel to collection events, then load
    /// whatever the store already holds (a `Reset` materializes one view per
    /// member, in sorted order).
    pub async fn new(store: S) -> Result<Self, StoreError> {
        let mut articles = ArticleList::new(store);
        let panel = Rc::new(RefCell::new(ViewPanel::default()));

        let subscription = {
            let panel = Rc::clone(&panel);
            articles
                .listeners()
                .subscribe(move |event| panel.borrow_mut().apply(event))
        };

        articles.fetch().await?;

        Ok(App {
            articles,
            panel,
            entry: EntryForm::default(),
            subscription,
        })
    }

    pub fn articles(&self) -> &ArticleList<S> {
        &self.articles
    }

    pub fn panel(&self) -> Ref<'_, ViewPanel> {
        self.panel.borrow()
    }

    /// Current value of a new-entry input.
    pub fn entry(&self, field: Field) -> &str {
        self.entry.field(field)
    }

    /// Type into a new-entry input.
    pub fn set_entry(&mut self, field: Field, text: impl Into<String>) {
        *self.entry.field_mut(field) = text.into();
    }

    /// The "create" gesture: build a record from the three entry inputs
    /// (order comes from `next_order`), clear the inputs, persist.
    ///
    /// The inputs are cleared whether or not persistence succeeds.
    pub async fn create(&mut self) -> Result<LocalKey, ListError> {
        let draft = self.entry.drain();
        self.articles.create(draft).await
    }

    /// Re-fetch the full collection from the store.
    pub async fn refetch(&mut self) -> Result<usize, StoreError> {
        self.articles.fetch().await
    }

    /// Put a view into edit mode. Returns `false` for an unknown key.
    pub fn edit(&mut self, key: LocalKey) -> bool {
        match self.panel.borrow_mut().get_mut(key) {
            Some(view) => {
                view.edit();
                true
            }
            None => false,
        }
    }

    /// Type into one of a view's edit inputs. Returns `false` for an
    /// unknown key.
    pub fn input(&mut self, key: LocalKey, field: Field, text: impl Into<String>) -> bool {
        match self.panel.borrow_mut().get_mut(key) {
            Some(view) => {
                view.set_input(field, text);
                true
            }
            None => false,
        }
    }

    /// Commit a view's edits: leave edit mode immediately, then save the
    /// three input values on the bound record.
    pub async fn commit(&mut self, key: LocalKey) -> Result<(), ListError> {
        let payload = self
            .panel
            .borrow_mut()
            .get_mut(key)
            .map(ArticleView::commit)
            .ok_or(ListError::UnknownRecord(key))?;
        self.save_payload(key, payload).await
    }

    /// Route a key press to a view; Enter inside edit mode commits.
    /// Returns `true` when a commit happened.
    pub async fn key_press(&mut self, key: LocalKey, press: KeyPress) -> Result<bool, ListError> {
        let payload = self
            .panel
            .borrow_mut()
            .get_mut(key)
            .and_then(|view| view.handle_key(press));
        match payload {
            Some(payload) => {
                self.save_payload(key, payload).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// The remove gesture on a view: destroy the record (never a
    /// local-only hide).
    pub async fn clear_article(&mut self, key: LocalKey) -> Result<(), ListError> {
        self.articles.clear(key).await
    }

    async fn save_payload(&mut self, key: LocalKey, payload: EditPayload) -> Result<(), ListError> {
        self.articles.save(key, payload.changes()).await
    }
}

impl<S: RemoteStore> Drop for App<S> {
    fn drop(&mut self) {
        self.articles.listeners().unsubscribe(self.subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn starts_empty_against_an_empty_store() {
        let app = App::new(MemoryStore::new()).await.unwrap();
        assert!(app.panel().is_empty());
        // the initial fetch's Reset already counts as a refresh
        assert_eq!(app.panel().refreshes(), 1);
    }

    #[tokio::test]
    async fn create_clears_the_entry_form() {
        let mut app = App::new(MemoryStore::new()).await.unwrap();
        app.set_entry(Field::Title, "T");
        app.set_entry(Field::Author, "A");
        app.set_entry(Field::Content, "C");

        let key = app.create().await.unwrap();

        assert_eq!(app.entry(Field::Title), "");
        assert_eq!(app.entry(Field::Author), "");
        assert_eq!(app.entry(Field::Content), "");
        assert_eq!(app.panel().get(key).unwrap().rendered().title, "T");
    }

    #[tokio::test]
    async fn gestures_on_unknown_keys_are_reported() {
        let mut app = App::new(MemoryStore::new()).await.unwrap();
        let ghost = LocalKey(99);
        assert!(!app.edit(ghost));
        assert!(!app.input(ghost, Field::Title, "x"));
        assert_eq!(
            app.commit(ghost).await.unwrap_err(),
            ListError::UnknownRecord(ghost)
        );
    }
}
