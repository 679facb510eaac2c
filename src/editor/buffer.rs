use std::ops::Range;

use ropey::Rope;

use crate::outline::HeadingRecord;

/// The raw markdown being edited, backed by a rope.
///
/// Mirrors a plain textarea: a selection expressed as a byte range, where an
/// empty range is a caret. Positions are byte offsets into the text and are
/// always kept on character boundaries.
pub struct SourceBuffer {
    rope: Rope,
    selection: Range<usize>,
    dirty: bool,
}

impl SourceBuffer {
    /// Create a new buffer from a string, caret at the start.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            selection: 0..0,
            dirty: false,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// Whether the buffer has been modified since creation or last publish.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Length of the text in bytes.
    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Total number of lines; an empty buffer has one line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Content of a 0-based line without its line ending.
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let s = self.rope.line(line_idx).to_string();
        Some(s.trim_end_matches('\n').trim_end_matches('\r').to_string())
    }

    /// The 1-based line containing byte `offset` (clamped to the text).
    pub fn line_of_byte(&self, offset: usize) -> usize {
        self.rope.byte_to_line(offset.min(self.rope.len_bytes())) + 1
    }

    /// Byte offset of the first occurrence of `needle`.
    pub fn find(&self, needle: &str) -> Option<usize> {
        if needle.is_empty() {
            return None;
        }
        self.text().find(needle)
    }

    /// The 1-based line a heading currently sits on.
    ///
    /// Trusts the line recorded at extraction time when that line still
    /// starts with the heading's hashes, then falls back to a literal search
    /// for `"## Text"`. Returns `None` when the heading is gone.
    pub fn heading_line(&self, heading: &HeadingRecord) -> Option<usize> {
        let hashes = "#".repeat(usize::from(heading.level));
        if let Some(line) = heading.line.checked_sub(1).and_then(|i| self.line_at(i))
            && let Some(rest) = line.strip_prefix(&hashes)
            && rest.starts_with(' ')
            && crate::outline::extract_outline(&line)
                .first()
                .is_some_and(|h| h.text == heading.text)
        {
            return Some(heading.line);
        }
        self.find(&heading.markdown_prefix())
            .map(|offset| self.line_of_byte(offset))
    }

    /// The current selection as a byte range.
    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// Select a byte range, clamped to the text and snapped to characters.
    pub fn select(&mut self, range: Range<usize>) {
        let start = self.snap(range.start);
        let end = self.snap(range.end.max(range.start));
        self.selection = start..end;
    }

    /// Place the caret at a byte offset.
    pub fn set_caret(&mut self, offset: usize) {
        self.select(offset..offset);
    }

    /// Replace the whole text, keeping the caret inside the new bounds.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        let caret = self.snap(self.selection.end);
        self.selection = caret..caret;
        self.dirty = true;
    }

    /// Replace the selection with `text` and leave the caret after it.
    pub fn insert_at_cursor(&mut self, text: &str) {
        let start = self.rope.byte_to_char(self.selection.start);
        let end = self.rope.byte_to_char(self.selection.end);
        if start != end {
            self.rope.remove(start..end);
        }
        self.rope.insert(start, text);
        let caret = self.selection.start + text.len();
        self.selection = caret..caret;
        self.dirty = true;
    }

    fn snap(&self, offset: usize) -> usize {
        let offset = offset.min(self.rope.len_bytes());
        self.rope.char_to_byte(self.rope.byte_to_char(offset))
    }
}

impl Default for SourceBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for SourceBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceBuffer")
            .field("len_bytes", &self.rope.len_bytes())
            .field("lines", &self.rope.len_lines())
            .field("selection", &self.selection)
            .field("dirty", &self.dirty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::extract_outline;

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = SourceBuffer::empty();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some(String::new()));
        assert_eq!(buf.text(), "");
    }

    #[test]
    fn test_line_count_counts_newlines_plus_one() {
        assert_eq!(SourceBuffer::from_text("a\nb\nc").line_count(), 3);
        assert_eq!(SourceBuffer::from_text("a\nb\n").line_count(), 3);
    }

    #[test]
    fn test_line_at_strips_crlf() {
        let buf = SourceBuffer::from_text("one\r\ntwo");
        assert_eq!(buf.line_at(0), Some("one".to_string()));
        assert_eq!(buf.line_at(1), Some("two".to_string()));
        assert_eq!(buf.line_at(2), None);
    }

    #[test]
    fn test_line_of_byte_is_one_based() {
        let buf = SourceBuffer::from_text("ab\ncd\nef");
        assert_eq!(buf.line_of_byte(0), 1);
        assert_eq!(buf.line_of_byte(3), 2);
        assert_eq!(buf.line_of_byte(7), 3);
        assert_eq!(buf.line_of_byte(999), 3);
    }

    #[test]
    fn test_find_empty_needle_is_none() {
        let buf = SourceBuffer::from_text("abc");
        assert_eq!(buf.find(""), None);
        assert_eq!(buf.find("bc"), Some(1));
    }

    #[test]
    fn test_new_buffer_is_clean() {
        let buf = SourceBuffer::from_text("hello");
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_insert_at_caret() {
        let mut buf = SourceBuffer::from_text("hello world");
        buf.set_caret(5);
        buf.insert_at_cursor(",");
        assert_eq!(buf.text(), "hello, world");
        assert_eq!(buf.selection(), 6..6);
        assert!(buf.is_dirty());
    }

    #[test]
    fn test_insert_replaces_selection() {
        let mut buf = SourceBuffer::from_text("see IMAGE here");
        buf.select(4..9);
        buf.insert_at_cursor("![image](https://cdn/x.png)");
        assert_eq!(buf.text(), "see ![image](https://cdn/x.png) here");
        assert_eq!(buf.selection(), 31..31);
    }

    #[test]
    fn test_insert_after_multibyte_text() {
        let mut buf = SourceBuffer::from_text("你好");
        buf.set_caret(3);
        buf.insert_at_cursor("X");
        assert_eq!(buf.text(), "你X好");
        assert_eq!(buf.selection(), 4..4);
    }

    #[test]
    fn test_select_snaps_into_bounds() {
        let mut buf = SourceBuffer::from_text("你好");
        buf.select(1..100);
        assert_eq!(buf.selection(), 0..6);
    }

    #[test]
    fn test_set_text_clamps_caret() {
        let mut buf = SourceBuffer::from_text("a long line of text");
        buf.set_caret(15);
        buf.set_text("short");
        assert_eq!(buf.selection(), 5..5);
        buf.mark_clean();
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_heading_line_uses_recorded_line() {
        let buf = SourceBuffer::from_text("# Intro\ntext\n## Intro\n");
        let outline = crate::outline::extract_outline_with(
            &buf.text(),
            crate::outline::IdPolicy::Preserve,
        );
        // Both headings share text; the recorded line disambiguates.
        assert_eq!(buf.heading_line(outline.get(1).unwrap()), Some(3));
    }

    #[test]
    fn test_heading_line_falls_back_to_search_after_edit() {
        let outline = extract_outline("# Intro\n## Usage\n");
        let usage = outline.get(1).unwrap();
        let buf = SourceBuffer::from_text("# Intro\n\nnew paragraph\n\n## Usage\n");
        assert_eq!(buf.heading_line(usage), Some(5));
    }

    #[test]
    fn test_heading_line_handles_stripped_punctuation() {
        let md = "text\n## **Bold** move\n";
        let outline = extract_outline(md);
        let buf = SourceBuffer::from_text(md);
        assert_eq!(buf.heading_line(outline.get(0).unwrap()), Some(2));
    }

    #[test]
    fn test_heading_line_none_when_deleted() {
        let outline = extract_outline("# Intro\n## Usage\n");
        let buf = SourceBuffer::from_text("# Intro\n");
        assert_eq!(buf.heading_line(outline.get(1).unwrap()), None);
    }
}
