// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. outline::Outline)
    clippy::module_name_repetitions
)]

//! # Markline
//!
//! Heading outlines and scroll synchronization for markdown posts.
//!
//! Markline turns the markdown body of a post into:
//! - An ordered outline of `#`, `##` and `###` headings with anchor ids
//! - An active heading that follows the reader down the page
//! - A source pane and a preview pane that scroll together
//!
//! Rendering and layout stay with the host. The host reports geometry
//! through the [`ui::ScrollPane`] and [`ui::AnchorGeometry`] traits; the
//! headless [`ui::Viewport`] implements both for tests and tools.
//!
//! ## Modules
//!
//! - [`outline`]: Heading extraction and anchor ids
//! - [`tracker`]: Active heading tracking
//! - [`sync`]: Source and preview scroll synchronization
//! - [`editor`]: Markdown source buffer
//! - [`view`]: Reader and editor views
//! - [`post`]: Post records and content sources
//! - [`session`]: Editing credentials
//! - [`ui`]: Host scroll traits and a headless viewport
//! - [`config`]: Flag files
//! - [`watcher`]: File watching

pub mod config;
pub mod editor;
pub mod outline;
pub mod post;
pub mod session;
pub mod sync;
pub mod tracker;
pub mod ui;
pub mod view;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::editor::SourceBuffer;
    pub use crate::outline::{HeadingRecord, IdPolicy, Outline, extract_outline, generate_id};
    pub use crate::post::{ContentSource, Post};
    pub use crate::session::Session;
    pub use crate::sync::{PaneSync, Side, SyncOutcome};
    pub use crate::tracker::{ActiveHeadingTracker, ViewportEvent};
    pub use crate::ui::{AnchorGeometry, ScrollBehavior, ScrollPane, Viewport};
    pub use crate::view::{EditorView, EngineOptions, ReaderView};
}
