//! Raw markdown source buffer for the post editor.
//!
//! Provides a rope-backed text buffer with textarea-style selection and
//! the line lookups source-pane navigation needs.

mod buffer;

pub use buffer::SourceBuffer;
