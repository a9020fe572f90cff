//! Inline emphasis markup used inside outline text.
//!
//! Two forms are recognized: `**bold**` and `[[highlight]]`. Anything else,
//! including unbalanced markers, is plain text.

use regex::Regex;
use std::sync::LazyLock;

static MARKUP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*|\[\[(.+?)\]\]").unwrap());

/// How a span of text should be emphasized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Plain,
    Bold,
    /// Bold in the accent color.
    Highlight,
}

/// A run of text with uniform emphasis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span<'a> {
    pub text: &'a str,
    pub emphasis: Emphasis,
}

/// Split text into emphasis spans. Empty spans are never produced.
pub fn parse_spans(text: &str) -> Vec<Span<'_>> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in MARKUP_REGEX.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            spans.push(Span {
                text: &text[last..whole.start()],
                emphasis: Emphasis::Plain,
            });
        }
        if let Some(bold) = caps.get(1) {
            spans.push(Span {
                text: bold.as_str(),
                emphasis: Emphasis::Bold,
            });
        } else if let Some(highlight) = caps.get(2) {
            spans.push(Span {
                text: highlight.as_str(),
                emphasis: Emphasis::Highlight,
            });
        }
        last = whole.end();
    }

    if last < text.len() {
        spans.push(Span {
            text: &text[last..],
            emphasis: Emphasis::Plain,
        });
    }

    spans
}
