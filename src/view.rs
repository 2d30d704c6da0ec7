//! Per-record view: rendered labels plus an explicit edit-mode state machine.
//!
//! A view mirrors exactly one record. `Display` shows the rendered labels;
//! `Editing` exposes three input buffers seeded from the last render. The
//! only transitions are the ones below — commit and re-render both land in
//! `Display`, so a failed save can never strand a view in edit mode:
//!
//! ```text
//! Display --edit()--> Editing
//! Editing --commit / handle_key(Enter) / render()--> Display
//! ```

use crate::record::{Article, ArticleChanges, LocalKey};

/// Which of the three editable fields a gesture refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Author,
    Content,
}

/// Edit-mode state of a view.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ViewState {
    Display,
    Editing,
}

/// A key press routed to a view while it has focus.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyPress {
    Enter,
    Char(char),
}

/// The displayed labels, refreshed on every render.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rendered {
    pub title: String,
    pub author: String,
    pub content: String,
}

/// The field values read back from the inputs on commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditPayload {
    pub title: String,
    pub author: String,
    pub content: String,
}

impl EditPayload {
    /// The save batch for this commit: all three fields, order untouched.
    pub fn changes(self) -> ArticleChanges {
        ArticleChanges::new()
            .title(self.title)
            .author(self.author)
            .content(self.content)
    }
}

/// One-to-one presentation and edit surface for a single record.
pub struct ArticleView {
    key: LocalKey,
    state: ViewState,
    rendered: Rendered,
    title_input: String,
    author_input: String,
    content_input: String,
    focus: Option<Field>,
}

impl ArticleView {
    /// Build a view bound to `article` and render it once.
    pub fn new(article: &Article) -> Self {
        let mut view = ArticleView {
            key: article.key(),
            state: ViewState::Display,
            rendered: Rendered::default(),
            title_input: String::new(),
            author_input: String::new(),
            content_input: String::new(),
            focus: None,
        };
        view.render(article);
        view
    }

    pub fn key(&self) -> LocalKey {
        self.key
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn rendered(&self) -> &Rendered {
        &self.rendered
    }

    pub fn focus(&self) -> Option<Field> {
        self.focus
    }

    pub fn input(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title_input,
            Field::Author => &self.author_input,
            Field::Content => &self.content_input,
        }
    }

    /// Re-render from the record's current attributes.
    ///
    /// Resets the input buffers to the rendered values and always lands in
    /// `Display` — this is what restores a deterministic state after any
    /// change notification, including one caused by the view's own save.
    pub fn render(&mut self, article: &Article) {
        debug_assert_eq!(article.key(), self.key);
        self.rendered = Rendered {
            title: article.title().to_string(),
            author: article.author().to_string(),
            content: article.content().to_string(),
        };
        self.title_input = self.rendered.title.clone();
        self.author_input = self.rendered.author.clone();
        self.content_input = self.rendered.content.clone();
        self.state = ViewState::Display;
        self.focus = None;
    }

    /// Enter edit mode (user gesture on any editable field); focus moves to
    /// the content input.
    pub fn edit(&mut self) {
        self.state = ViewState::Editing;
        self.focus = Some(Field::Content);
    }

    /// Overwrite one input buffer. Ignored outside edit mode.
    pub fn set_input(&mut self, field: Field, text: impl Into<String>) {
        if self.state != ViewState::Editing {
            return;
        }
        self.focus = Some(field);
        match field {
            Field::Title => self.title_input = text.into(),
            Field::Author => self.author_input = text.into(),
            Field::Content => self.content_input = text.into(),
        }
    }

    /// Leave edit mode and read back the three input values.
    ///
    /// The caller forwards the payload to `save`; the view does not wait for
    /// the persistence outcome.
    pub fn commit(&mut self) -> EditPayload {
        self.state = ViewState::Display;
        self.focus = None;
        EditPayload {
            title: self.title_input.clone(),
            author: self.author_input.clone(),
            content: self.content_input.clone(),
        }
    }

    /// Key routing: Enter inside any input commits, everything else is left
    /// to the input buffers.
    pub fn handle_key(&mut self, key: KeyPress) -> Option<EditPayload> {
        match (self.state, key) {
            (ViewState::Editing, KeyPress::Enter) => Some(self.commit()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ArticleDraft, LocalKey};

    fn article() -> Article {
        Article::from_draft(
            LocalKey(1),
            ArticleDraft::new().title("T").author("A").content("C"),
            1,
        )
    }

    #[test]
    fn new_view_renders_in_display_mode() {
        let view = ArticleView::new(&article());
        assert_eq!(view.state(), ViewState::Display);
        assert_eq!(view.rendered().title, "T");
        assert_eq!(view.input(Field::Content), "C");
        assert_eq!(view.focus(), None);
    }

    #[test]
    fn edit_focuses_content() {
        let mut view = ArticleView::new(&article());
        view.edit();
        assert_eq!(view.state(), ViewState::Editing);
        assert_eq!(view.focus(), Some(Field::Content));
    }

    #[test]
    fn commit_reads_back_edited_inputs() {
        let mut view = ArticleView::new(&article());
        view.edit();
        view.set_input(Field::Title, "T2");
        let payload = view.commit();

        assert_eq!(view.state(), ViewState::Display);
        assert_eq!(payload.title, "T2");
        assert_eq!(payload.author, "A");
        assert_eq!(payload.content, "C");
    }

    #[test]
    fn unchanged_commit_round_trips_original_values() {
        let mut view = ArticleView::new(&article());
        let before = view.rendered().clone();

        view.edit();
        let payload = view.commit();
        assert_eq!(payload.title, before.title);
        assert_eq!(payload.author, before.author);
        assert_eq!(payload.content, before.content);
        assert_eq!(view.rendered(), &before);
    }

    #[test]
    fn input_is_ignored_in_display_mode() {
        let mut view = ArticleView::new(&article());
        view.set_input(Field::Title, "ignored");
        assert_eq!(view.input(Field::Title), "T");
    }

    #[test]
    fn enter_commits_only_while_editing() {
        let mut view = ArticleView::new(&article());
        assert_eq!(view.handle_key(KeyPress::Enter), None);

        view.edit();
        assert_eq!(view.handle_key(KeyPress::Char('x')), None);
        assert_eq!(view.state(), ViewState::Editing);

        let payload = view.handle_key(KeyPress::Enter).expect("commit");
        assert_eq!(payload.content, "C");
        assert_eq!(view.state(), ViewState::Display);
    }

    #[test]
    fn render_exits_edit_mode_and_resets_buffers() {
        let mut view = ArticleView::new(&article());
        view.edit();
        view.set_input(Field::Content, "half-typed");

        view.render(&article());
        assert_eq!(view.state(), ViewState::Display);
        assert_eq!(view.input(Field::Content), "C");
    }
}
