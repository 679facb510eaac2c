//! The two views that use the outline engine.
//!
//! - [`ReaderView`]: a published post with a table of contents that
//!   highlights the heading being read
//! - [`EditorView`]: the post editor with side-by-side source and preview
//!   panes kept in step
//!
//! Each view owns its outline and its scroll state. Tearing a view down
//! releases both, after which events from the host are ignored.

mod editor;
mod reader;

pub use editor::EditorView;
pub use reader::ReaderView;

use thiserror::Error;

use crate::outline::IdPolicy;
use crate::tracker::DEFAULT_TRIGGER_OFFSET;
use crate::ui::ScrollBehavior;

/// Tunables shared by both views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    /// Distance from the viewport top to the reading focus line
    pub trigger_offset: f64,
    /// Duplicate heading id handling
    pub id_policy: IdPolicy,
    /// Behavior of heading navigation scrolls
    pub scroll_behavior: ScrollBehavior,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            trigger_offset: DEFAULT_TRIGGER_OFFSET,
            id_policy: IdPolicy::default(),
            scroll_behavior: ScrollBehavior::default(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditorError {
    #[error("editing requires an authenticated session")]
    Unauthenticated,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PublishError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("content must not be empty")]
    EmptyContent,
    #[error("editor has been closed")]
    Closed,
}
