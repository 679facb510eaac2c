//! Markdown heading outline (table of contents).
//!
//! This module handles:
//! - Deriving stable anchor ids from heading text
//! - Masking fenced code blocks so `#` lines inside code are not headings
//! - Extracting the ordered heading records of a document

mod extract;
mod slug;
mod types;

pub use extract::{extract_outline, extract_outline_with};
pub use slug::generate_id;
pub use types::{HeadingRecord, IdPolicy, Outline};
