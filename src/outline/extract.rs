//! Heading outline extraction from raw markdown.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::slug::IdAllocator;
use super::{HeadingRecord, IdPolicy, Outline, generate_id};

/// A fenced code block: an opening ``` line through the next ``` line, or
/// through the end of the text when the fence is never closed.
static FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?ms)^[ \t]*```.*?(?:^[ \t]*```[^\n]*$|\z)").expect("fence regex is valid")
});

/// ATX headings of depth 1-3.
static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(#{1,3}) +(\S.*)$").expect("heading regex is valid"));

/// Inline markdown punctuation removed from heading text.
const STRIPPED_PUNCTUATION: &[char] = &['*', '_', '`', '[', ']', '(', ')'];

/// Extract the outline of `raw` with the default id policy.
///
/// ```
/// use markline::outline::extract_outline;
///
/// let outline = extract_outline("# Real\n```\n# Fake\n```\n## Real2");
/// assert_eq!(outline.ids(), vec!["real", "real2"]);
/// ```
pub fn extract_outline(raw: &str) -> Outline {
    extract_outline_with(raw, IdPolicy::default())
}

/// Extract the outline of `raw`, resolving duplicate ids with `policy`.
///
/// Never fails: an unterminated fence hides everything after it, and text
/// without headings yields an empty outline.
pub fn extract_outline_with(raw: &str, policy: IdPolicy) -> Outline {
    let _span = tracing::debug_span!("extract_outline", bytes = raw.len()).entered();
    let visible = mask_code_fences(raw);
    let mut ids = IdAllocator::new(policy);
    let mut headings = Vec::new();
    let mut line = 1;
    let mut scanned = 0;

    for caps in HEADING.captures_iter(&visible) {
        let Some(whole) = caps.get(0) else { continue };
        line += visible[scanned..whole.start()].matches('\n').count();
        scanned = whole.start();

        // `#{1,3}` guarantees the level fits
        #[allow(clippy::cast_possible_truncation)]
        let level = caps[1].len() as u8;
        let text = clean_heading_text(&caps[2]);
        if text.is_empty() {
            continue;
        }
        let id = ids.allocate(generate_id(&text));
        headings.push(HeadingRecord {
            level,
            text,
            id,
            line,
        });
    }

    tracing::debug!(count = headings.len(), "outline extracted");
    Outline::from_headings(headings)
}

/// Blank out fenced code blocks while keeping every newline, so line
/// numbers in the masked text still match `raw`.
fn mask_code_fences(raw: &str) -> Cow<'_, str> {
    FENCE.replace_all(raw, |caps: &Captures<'_>| {
        caps[0].chars().filter(|&c| c == '\n').collect::<String>()
    })
}

fn clean_heading_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}
