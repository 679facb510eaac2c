//! Anchor id generation.

use std::collections::HashMap;

use super::IdPolicy;

/// Derive the anchor id for a heading's text.
///
/// Lowercases and trims the text, collapses every run of characters that
/// are neither ASCII word characters nor CJK ideographs into one hyphen,
/// then strips hyphens from both ends. Returns an empty string only when
/// the text has no word or CJK characters at all.
///
/// ```
/// use markline::outline::generate_id;
///
/// assert_eq!(generate_id("Hello, World!"), "hello-world");
/// assert_eq!(generate_id("快速 开始"), "快速-开始");
/// ```
pub fn generate_id(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_dash = false;
    for ch in lowered.trim().chars() {
        if is_id_char(ch) {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch);
        } else {
            pending_dash = true;
        }
    }
    out
}

fn is_id_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || is_cjk_ideograph(ch)
}

// Unified ideographs, extensions A-F and the compatibility block.
const fn is_cjk_ideograph(ch: char) -> bool {
    matches!(
        ch,
        '\u{3400}'..='\u{4DBF}'
            | '\u{4E00}'..='\u{9FFF}'
            | '\u{F900}'..='\u{FAFF}'
            | '\u{20000}'..='\u{2EBEF}'
    )
}

/// Tracks ids already handed out within one document.
#[derive(Debug, Default)]
pub(crate) struct IdAllocator {
    policy: IdPolicy,
    seen: HashMap<String, usize>,
}

impl IdAllocator {
    pub(crate) fn new(policy: IdPolicy) -> Self {
        Self {
            policy,
            seen: HashMap::new(),
        }
    }

    pub(crate) fn allocate(&mut self, base: String) -> String {
        if self.policy == IdPolicy::Preserve {
            return base;
        }
        let count = self.seen.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            return base;
        }
        let mut n = *count;
        loop {
            let candidate = format!("{base}-{n}");
            // "a-2" may already exist as a literal heading
            if !self.seen.contains_key(&candidate) {
                self.seen.insert(candidate.clone(), 1);
                return candidate;
            }
            n += 1;
        }
    }
}
