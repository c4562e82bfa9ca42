//! Section Splitter.
//!
//! Three independent heading-detection strategies behind one trait, plus a
//! hybrid selector that runs a list of strategies and keeps the richest
//! result. The selector only sees `SectionStrategy`, never strategy
//! internals.

pub mod types;
pub mod numbered;
pub mod markdown;
pub mod flexible;
pub mod hybrid;
pub mod cleanup;

pub use types::*;
pub use numbered::*;
pub use markdown::*;
pub use flexible::*;
pub use hybrid::*;
pub use cleanup::*;

use std::borrow::Cow;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// One heading-detection algorithm.
pub trait SectionStrategy: Send + Sync {
    /// Short stable name for logs and output.
    fn name(&self) -> &'static str;

    /// Split `text` into sections. `None` when no heading was recognized.
    fn split(&self, text: &str) -> Option<SectionMap>;
}

/// Name given to non-blank text that precedes the first heading.
pub const PREAMBLE_SECTION: &str = "PREAMBLE";

/// Fenced code block, opening fence line through closing fence.
static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[^\n]*\n.*?```").expect("Invalid fenced block regex"));

/// A heading line found by a strategy.
#[derive(Debug, Clone)]
pub(crate) struct HeadingHit {
    /// Byte offset of the heading line start.
    pub start: usize,
    /// Byte offset just past the heading line.
    pub end: usize,
    pub name: String,
}

/// Byte ranges of fenced code blocks.
pub(crate) fn fenced_spans(text: &str) -> Vec<Range<usize>> {
    FENCED_BLOCK.find_iter(text).map(|m| m.range()).collect()
}

pub(crate) fn inside_any(spans: &[Range<usize>], offset: usize) -> bool {
    spans.iter().any(|r| r.contains(&offset))
}

/// CRLF and lone CR become LF so `$` anchors behave on every platform.
pub(crate) fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Upper-case, keep `[A-Z0-9 \-()_&]`, collapse runs of spaces.
pub fn normalize_heading(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '(' | ')' | '_' | '&'))
        .collect();
    kept.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Turn heading hits into a `SectionMap`.
///
/// Body = span between consecutive headings, trimmed. Non-blank text before
/// the first heading becomes the `PREAMBLE` section. A heading with a blank
/// body still produces a section, in every strategy.
pub(crate) fn assemble(text: &str, hits: &[HeadingHit], strategy: &'static str) -> Option<SectionMap> {
    let first = hits.first()?;
    let mut map = SectionMap::new();

    let preamble = text[..first.start].trim();
    if !preamble.is_empty() {
        map.insert(PREAMBLE_SECTION, preamble);
    }

    for (i, hit) in hits.iter().enumerate() {
        let body_end = hits.get(i + 1).map_or(text.len(), |next| next.start);
        let body = text[hit.end.min(body_end)..body_end].trim();
        if map.insert(hit.name.clone(), body) {
            tracing::debug!(strategy, section = %hit.name, "duplicate_section: later body replaces earlier");
        }
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_heading_strips_and_uppercases() {
        assert_eq!(normalize_heading("  Executive   Summary: "), "EXECUTIVE SUMMARY");
        assert_eq!(
            normalize_heading("Code Structure & Quality Review"),
            "CODE STRUCTURE & QUALITY REVIEW"
        );
        assert_eq!(
            normalize_heading("Instruction-Level Analysis (Required)"),
            "INSTRUCTION-LEVEL ANALYSIS (REQUIRED)"
        );
    }

    #[test]
    fn fenced_spans_cover_blocks() {
        let text = "a\n```json\n[1]\n```\nb";
        let spans = fenced_spans(text);
        assert_eq!(spans.len(), 1);
        assert!(inside_any(&spans, text.find("[1]").unwrap()));
        assert!(!inside_any(&spans, text.find('b').unwrap()));
    }

    #[test]
    fn unclosed_fence_is_not_a_block() {
        assert!(fenced_spans("```json\n[1, 2").is_empty());
    }

    #[test]
    fn newlines_are_normalized() {
        assert_eq!(normalize_newlines("a\r\nb\rc"), "a\nb\nc");
        assert!(matches!(normalize_newlines("a\nb"), Cow::Borrowed(_)));
    }

    #[test]
    fn assemble_without_hits_is_none() {
        assert!(assemble("plain text", &[], "test").is_none());
    }

    #[test]
    fn assemble_keeps_preamble() {
        let text = "intro\nHEAD\nbody";
        let hits = [HeadingHit {
            start: 6,
            end: 10,
            name: "HEAD".into(),
        }];
        let map = assemble(text, &hits, "test").unwrap();
        assert_eq!(map.get(PREAMBLE_SECTION), Some("intro"));
        assert_eq!(map.get("HEAD"), Some("body"));
    }
}
