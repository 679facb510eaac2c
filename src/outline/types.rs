//! Core outline types.

use serde::Serialize;

/// A single heading found in a markdown source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingRecord {
    /// Heading level (1-3)
    pub level: u8,
    /// Heading text with emphasis/code/link punctuation stripped
    pub text: String,
    /// Anchor identifier derived from `text`
    pub id: String,
    /// 1-based line number in the source text
    pub line: usize,
}

impl HeadingRecord {
    /// The markdown prefix this heading is written as (`"## Text"`).
    ///
    /// Only matches the raw source when the heading carried no stripped
    /// punctuation; callers treat a miss as a stale heading.
    pub fn markdown_prefix(&self) -> String {
        format!("{} {}", "#".repeat(usize::from(self.level)), self.text)
    }
}

/// How to treat two headings that normalize to the same anchor id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdPolicy {
    /// Append `-2`, `-3`, ... to repeated ids, in document order.
    #[default]
    Suffix,
    /// Keep colliding ids as-is. Anchor lookups resolve to the first match.
    Preserve,
}

/// The ordered headings of one document.
///
/// Recomputed from scratch whenever the source changes and never mutated
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Outline {
    headings: Vec<HeadingRecord>,
}

impl Outline {
    pub(crate) const fn from_headings(headings: Vec<HeadingRecord>) -> Self {
        Self { headings }
    }

    /// An outline with no headings.
    pub const fn empty() -> Self {
        Self {
            headings: Vec::new(),
        }
    }

    pub fn headings(&self) -> &[HeadingRecord] {
        &self.headings
    }

    pub fn get(&self, index: usize) -> Option<&HeadingRecord> {
        self.headings.get(index)
    }

    pub fn first(&self) -> Option<&HeadingRecord> {
        self.headings.first()
    }

    pub fn len(&self) -> usize {
        self.headings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }

    /// Anchor ids in document order.
    pub fn ids(&self) -> Vec<&str> {
        self.headings.iter().map(|h| h.id.as_str()).collect()
    }

    /// Index of the first heading with the given id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.headings.iter().position(|h| h.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HeadingRecord> {
        self.headings.iter()
    }
}

/// One heading per line, indented two spaces per level below 1, with its
/// anchor after the text.
impl std::fmt::Display for Outline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for heading in &self.headings {
            let indent = "  ".repeat(usize::from(heading.level.saturating_sub(1)));
            writeln!(f, "{indent}{}  #{}", heading.text, heading.id)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Outline {
    type Item = &'a HeadingRecord;
    type IntoIter = std::slice::Iter<'a, HeadingRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.headings.iter()
    }
}
