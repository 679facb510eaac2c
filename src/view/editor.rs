use std::ops::Range;

use crate::editor::SourceBuffer;
use crate::outline::{Outline, extract_outline_with};
use crate::post::Post;
use crate::session::Session;
use crate::sync::{NavigationOutcome, PaneSync, Side, SyncOutcome};
use crate::ui::{AnchorGeometry, ScrollPane};

use super::{EditorError, EngineOptions, PublishError};

/// The post editor: a markdown source pane next to a rendered preview.
#[derive(Debug)]
pub struct EditorView {
    options: EngineOptions,
    /// The post being edited; `None` for a new post
    base: Option<Post>,
    title: String,
    buffer: SourceBuffer,
    outline: Outline,
    sync: PaneSync,
    open: bool,
}

impl EditorView {
    /// Open the editor for a new post, or for `existing`.
    ///
    /// # Errors
    /// Returns [`EditorError::Unauthenticated`] unless `session` is
    /// authenticated.
    pub fn open(
        session: &Session,
        existing: Option<Post>,
        options: EngineOptions,
    ) -> Result<Self, EditorError> {
        if !session.is_authenticated() {
            return Err(EditorError::Unauthenticated);
        }
        let (title, body) = existing
            .as_ref()
            .map(|post| (post.title.clone(), post.body().into_owned()))
            .unwrap_or_default();
        let buffer = SourceBuffer::from_text(&body);
        let outline = extract_outline_with(&body, options.id_policy);
        tracing::debug!(
            post = existing.as_ref().map(|p| p.id),
            headings = outline.len(),
            "editor opened"
        );
        Ok(Self {
            options,
            base: existing,
            title,
            buffer,
            outline,
            sync: PaneSync::new(options.scroll_behavior),
            open: true,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub const fn buffer(&self) -> &SourceBuffer {
        &self.buffer
    }

    pub const fn outline(&self) -> &Outline {
        &self.outline
    }

    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Replace the whole source text.
    pub fn set_text(&mut self, text: &str) {
        self.buffer.set_text(text);
        self.refresh_outline();
    }

    /// Select a byte range of the source text.
    pub fn select(&mut self, range: Range<usize>) {
        self.buffer.select(range);
    }

    /// Replace the selection with `text`, caret after it.
    pub fn insert_at_cursor(&mut self, text: &str) {
        self.buffer.insert_at_cursor(text);
        self.refresh_outline();
    }

    /// Insert markdown for an uploaded image at the cursor.
    pub fn insert_image(&mut self, url: &str) {
        self.insert_at_cursor(&format!("![image]({url})"));
    }

    fn refresh_outline(&mut self) {
        if !self.open {
            return;
        }
        self.outline = extract_outline_with(&self.buffer.text(), self.options.id_policy);
    }

    /// The user scrolled the source pane.
    pub fn on_source_scroll(
        &mut self,
        source: &mut impl ScrollPane,
        preview: &mut impl ScrollPane,
    ) -> Option<SyncOutcome> {
        self.open
            .then(|| self.sync.on_scroll(Side::Source, source, preview))
    }

    /// The user scrolled the preview pane.
    pub fn on_preview_scroll(
        &mut self,
        source: &mut impl ScrollPane,
        preview: &mut impl ScrollPane,
    ) -> Option<SyncOutcome> {
        self.open
            .then(|| self.sync.on_scroll(Side::Preview, source, preview))
    }

    /// A smooth scroll on `side` finished.
    pub fn on_scroll_settled(&mut self, side: Side) {
        self.sync.settle(side);
    }

    /// Jump both panes to the outline entry at `index`.
    pub fn jump_to_heading<S, P>(
        &mut self,
        index: usize,
        source: &mut S,
        preview: &mut P,
    ) -> Option<NavigationOutcome>
    where
        S: ScrollPane,
        P: ScrollPane + AnchorGeometry,
    {
        if !self.open {
            return None;
        }
        let heading = self.outline.get(index)?;
        Some(
            self.sync
                .navigate_to_heading(heading, &self.buffer, source, preview),
        )
    }

    /// Build the post to send to the content service.
    ///
    /// Keeps the id and metadata of the post being edited.
    ///
    /// # Errors
    /// Returns an error when the title or content is blank, or the editor
    /// was closed.
    pub fn publish(&mut self, created_at: impl Into<String>) -> Result<Post, PublishError> {
        if !self.open {
            return Err(PublishError::Closed);
        }
        if self.title.trim().is_empty() {
            return Err(PublishError::EmptyTitle);
        }
        let content = self.buffer.text();
        if content.trim().is_empty() {
            return Err(PublishError::EmptyContent);
        }
        let post = Post {
            title: self.title.clone(),
            content,
            created_at: created_at.into(),
            ..self.base.clone().unwrap_or_default()
        };
        self.buffer.mark_clean();
        tracing::debug!(post = post.id, "draft ready to publish");
        Ok(post)
    }

    /// Release the outline and scroll state.
    pub fn close(&mut self) {
        self.open = false;
        self.outline = Outline::empty();
        self.sync.reset();
        tracing::debug!("editor closed");
    }
}
