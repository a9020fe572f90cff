//! Text cleanup for model-produced strings.
//!
//! Models return text with stray tabs, smart quotes, decomposed accents and
//! list markers copied from markdown. Everything that reaches the renderer
//! goes through [`TextCleaner`] first.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex to collapse runs of horizontal whitespace into one space.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{00A0}\u{3000}]+").unwrap());

/// Regex to match a leading bullet or enumerator on a body line.
static LIST_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-*+•・▪‣]\s+|\d{1,3}[.)]\s+)").unwrap());

/// Regex to match a leading section number like "2.", "3:" or "4 -".
static SECTION_NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,3})\s*[.:\-)]?\s+").unwrap());

/// Typographic quotes and their ASCII replacements.
const QUOTE_REPLACEMENTS: &[(char, char)] = &[
    ('\u{201C}', '"'),
    ('\u{201D}', '"'),
    ('\u{201E}', '"'),
    ('\u{2018}', '\''),
    ('\u{2019}', '\''),
    ('\u{201A}', '\''),
];

/// Cleans strings coming out of the model before validation.
#[derive(Debug, Clone)]
pub struct TextCleaner {
    /// Whether to replace typographic quotes with ASCII ones.
    ascii_quotes: bool,
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl TextCleaner {
    /// Create a cleaner with default settings.
    pub fn new() -> Self {
        Self { ascii_quotes: true }
    }

    /// Set whether typographic quotes become ASCII quotes.
    pub fn with_ascii_quotes(mut self, ascii_quotes: bool) -> Self {
        self.ascii_quotes = ascii_quotes;
        self
    }

    /// Clean a single-line value such as a heading.
    ///
    /// - NFC-normalizes the text
    /// - Drops characters XML cannot carry (see [`xml_safe`])
    /// - Replaces typographic quotes (if enabled)
    /// - Folds line breaks and whitespace runs into single spaces
    /// - Trims both ends
    pub fn clean_line(&self, text: &str) -> String {
        let mut result: String = xml_safe(text).nfc().collect();

        if self.ascii_quotes {
            result = result
                .chars()
                .map(|c| {
                    QUOTE_REPLACEMENTS
                        .iter()
                        .find(|(from, _)| *from == c)
                        .map_or(c, |(_, to)| *to)
                })
                .collect();
        }

        let result = result.replace("\r\n", " ").replace(['\r', '\n'], " ");
        WHITESPACE_COLLAPSE_REGEX
            .replace_all(&result, " ")
            .trim()
            .to_string()
    }

    /// Clean a bullet line, also dropping any leading list marker.
    pub fn clean_body_line(&self, text: &str) -> String {
        let cleaned = self.clean_line(text);
        LIST_MARKER_REGEX.replace(&cleaned, "").trim().to_string()
    }

    /// Split a multi-line block into cleaned bullet lines, skipping blanks.
    pub fn split_body(&self, text: &str) -> Vec<String> {
        xml_safe(text)
            .replace("\r\n", "\n")
            .split(['\n', '\r'])
            .map(|line| self.clean_body_line(line))
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Clean free text that keeps its line breaks, such as speaker notes.
    pub fn clean_block(&self, text: &str) -> String {
        let text: String = xml_safe(text).nfc().collect();
        text.replace("\r\n", "\n")
            .replace('\r', "\n")
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }
}

/// Remove characters XML 1.0 does not allow.
///
/// C0 controls other than tab, line feed and carriage return are dropped,
/// vertical tab and form feed become spaces, and the noncharacters U+FFFE and
/// U+FFFF are dropped. Borrows when there is nothing to change.
pub fn xml_safe(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_xml_illegal) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .filter_map(|c| match c {
                '\u{0B}' | '\u{0C}' => Some(' '),
                c if is_xml_illegal(c) => None,
                c => Some(c),
            })
            .collect(),
    )
}

fn is_xml_illegal(c: char) -> bool {
    matches!(
        c,
        '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}'
    )
}

/// Split a leading section number off a heading.
///
/// `"2. Market overview"` becomes `(Some(2), "Market overview")`. A heading
/// that is only a number is left alone.
pub fn split_section_number(heading: &str) -> (Option<u32>, String) {
    if let Some(caps) = SECTION_NUMBER_REGEX.captures(heading) {
        let rest = heading[caps[0].len()..].trim();
        if !rest.is_empty() {
            return (caps[1].parse().ok(), rest.to_string());
        }
    }
    (None, heading.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        let cleaner = TextCleaner::new();

        assert_eq!(cleaner.clean_line("Hello    world"), "Hello world");
        assert_eq!(cleaner.clean_line("  Hello  "), "Hello");
        assert_eq!(cleaner.clean_line("\t\tHello\t\t"), "Hello");
        assert_eq!(cleaner.clean_line("Line one\r\nLine two"), "Line one Line two");
    }

    #[test]
    fn test_smart_quotes() {
        let cleaner = TextCleaner::new();
        assert_eq!(
            cleaner.clean_line("\u{201C}Ship it\u{201D} isn\u{2019}t a plan"),
            "\"Ship it\" isn't a plan"
        );

        let keep = TextCleaner::new().with_ascii_quotes(false);
        assert_eq!(keep.clean_line("don\u{2019}t"), "don\u{2019}t");
    }

    #[test]
    fn test_nfc_normalization() {
        let cleaner = TextCleaner::new();
        // "e" followed by a combining acute accent
        assert_eq!(cleaner.clean_line("Caf\u{0065}\u{0301}"), "Caf\u{00E9}");
    }

    #[test]
    fn test_strip_list_markers() {
        let cleaner = TextCleaner::new();

        assert_eq!(cleaner.clean_body_line("- first"), "first");
        assert_eq!(cleaner.clean_body_line("* second"), "second");
        assert_eq!(cleaner.clean_body_line("• third"), "third");
        assert_eq!(cleaner.clean_body_line("12. twelfth"), "twelfth");
        assert_eq!(cleaner.clean_body_line("3) third"), "third");
        // Not a marker: no space after the dash
        assert_eq!(cleaner.clean_body_line("-5% growth"), "-5% growth");
        // Bold markup must survive
        assert_eq!(cleaner.clean_body_line("**bold** start"), "**bold** start");
    }

    #[test]
    fn test_split_body() {
        let cleaner = TextCleaner::new();
        let lines = cleaner.split_body("- one\n\n  - two  \r\n3. three\n");
        assert_eq!(lines, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_control_characters_removed() {
        let cleaner = TextCleaner::new();

        assert_eq!(cleaner.clean_line("Q\u{01}A"), "QA");
        assert_eq!(cleaner.clean_line("line\u{0B}break"), "line break");
        assert_eq!(cleaner.clean_line("end\u{FFFF}\u{1F}"), "end");
        assert_eq!(
            cleaner.split_body("one\u{07}\ntwo\u{0C}three"),
            vec!["one", "two three"]
        );
        assert_eq!(
            cleaner.clean_block("  Say hi\u{00}\r\n\u{1B}Then demo  "),
            "Say hi\nThen demo"
        );
    }

    #[test]
    fn test_xml_safe_borrows_clean_text() {
        assert!(matches!(xml_safe("plain\ttext\n"), Cow::Borrowed(_)));
        assert_eq!(xml_safe("a\u{02}b\u{0B}c"), "ab c");
    }

    #[test]
    fn test_split_section_number() {
        assert_eq!(
            split_section_number("2. Market overview"),
            (Some(2), "Market overview".to_string())
        );
        assert_eq!(
            split_section_number("10: Next steps"),
            (Some(10), "Next steps".to_string())
        );
        assert_eq!(split_section_number("3 Results"), (Some(3), "Results".to_string()));
        assert_eq!(split_section_number("Intro"), (None, "Intro".to_string()));
        assert_eq!(split_section_number("2024"), (None, "2024".to_string()));
        assert_eq!(
            split_section_number("2024 roadmap"),
            (None, "2024 roadmap".to_string())
        );
    }
}
