//! Parsing and repair of raw model output into a validated [`Outline`].
//!
//! The model is asked for a single JSON object, but what comes back is often
//! wrapped in prose or code fences, uses inconsistent key casing, or carries
//! the odd slide that makes no sense. Parsing runs in four steps:
//!
//! 1. extraction of the first balanced `{ ... }` block,
//! 2. JSON decode,
//! 3. per-slide coercion, where bad slides are dropped with a warning,
//! 4. deck-level checks.
//!
//! Only steps 1, 2 and an empty result from 4 are fatal.

use crate::error::SchemaError;
use crate::normalize::{split_section_number, TextCleaner};
use crate::types::{Outline, SlideKind, SlideSpec, Validated, DEFAULT_AUTHOR, DEFAULT_TITLE};
use serde_json::{Map, Value};

/// Key names accepted for each field, in priority order.
///
/// Keys are compared after lowercasing and removing `_` and `-`, so
/// `sectionNo`, `section_no` and `Section-No` all match `sectionno`.
mod keys {
    pub const DECK_TITLE: &[&str] = &["title", "decktitle", "presentationtitle", "name"];
    pub const AUTHOR: &[&str] = &["author", "presenter", "byline"];
    pub const SLIDES: &[&str] = &["slides", "pages"];

    pub const KIND: &[&str] = &["kind", "type", "layout", "slidetype"];
    pub const HEADING: &[&str] = &["heading", "title", "header", "headline"];
    pub const BODY: &[&str] = &["body", "points", "bullets", "items", "content", "lines"];
    pub const IMAGE: &[&str] = &["imageref", "image", "imageurl", "images", "picture"];
    pub const SUBTITLE: &[&str] = &["subtitle", "subhead", "subheading", "date"];
    pub const SECTION_NO: &[&str] = &["sectionno", "sectionnumber", "number"];
    pub const NOTES: &[&str] = &["notes", "speakernotes"];

    pub const ITEM_TEXT: &[&str] = &["text", "title", "label"];
    pub const ITEM_DETAIL: &[&str] = &["desc", "description", "detail"];
    pub const IMAGE_URL: &[&str] = &["url", "src", "href", "path"];
    pub const IMAGE_CAPTION: &[&str] = &["caption", "alt"];
}

/// Parser that turns raw model text into a validated outline.
#[derive(Debug, Clone, Default)]
pub struct OutlineParser {
    cleaner: TextCleaner,
}

impl OutlineParser {
    /// Create a parser with the default text cleaner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom text cleaner.
    pub fn with_cleaner(mut self, cleaner: TextCleaner) -> Self {
        self.cleaner = cleaner;
        self
    }

    /// Parse raw model output.
    pub fn parse(&self, raw_text: &str) -> Result<Validated, SchemaError> {
        let block = extract_structure(raw_text).ok_or(SchemaError::NoStructureFound)?;
        log::debug!("Extracted {} byte structure from model output", block.len());

        let value: Value = serde_json::from_str(block)
            .map_err(|e| SchemaError::MalformedStructure(e.to_string()))?;
        let Value::Object(root) = value else {
            return Err(SchemaError::MalformedStructure(
                "top-level value is not an object".to_string(),
            ));
        };

        let mut warnings = Vec::new();

        let title = field(&root, keys::DECK_TITLE)
            .and_then(as_text)
            .map(|t| self.cleaner.clean_line(&t))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| {
                warnings.push(format!("deck title missing, using \"{}\"", DEFAULT_TITLE));
                DEFAULT_TITLE.to_string()
            });

        let author = field(&root, keys::AUTHOR)
            .and_then(as_text)
            .map(|a| self.cleaner.clean_line(&a))
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| {
                log::debug!("Outline has no author, using \"{}\"", DEFAULT_AUTHOR);
                DEFAULT_AUTHOR.to_string()
            });

        let raw_slides: &[Value] = match field(&root, keys::SLIDES) {
            Some(Value::Array(items)) => items.as_slice(),
            Some(Value::Null) | None => &[],
            Some(_) => {
                return Err(SchemaError::MalformedStructure(
                    "\"slides\" is not a list".to_string(),
                ))
            }
        };

        let mut slides = Vec::with_capacity(raw_slides.len());
        for (idx, raw) in raw_slides.iter().enumerate() {
            let number = idx + 1;
            match self.coerce_slide(raw, number, &title, &mut warnings) {
                Ok(slide) => slides.push(slide),
                Err(reason) => warnings.push(format!("slide {}: dropped, {}", number, reason)),
            }
        }

        for warning in &warnings {
            log::warn!("{}", warning);
        }
        if slides.is_empty() {
            return Err(SchemaError::EmptyDeck);
        }

        log::info!(
            "Parsed outline \"{}\" with {} of {} slides",
            title,
            slides.len(),
            raw_slides.len()
        );

        let outline = Outline::new(title, author, slides)?;
        Ok(Validated { outline, warnings })
    }

    /// Coerce one raw slide entry, or explain why it must be dropped.
    fn coerce_slide(
        &self,
        raw: &Value,
        number: usize,
        deck_title: &str,
        warnings: &mut Vec<String>,
    ) -> Result<SlideSpec, String> {
        let Value::Object(map) = raw else {
            return Err("entry is not an object".to_string());
        };

        let kind = match field(map, keys::KIND).and_then(as_text) {
            Some(name) => SlideKind::from_name(&name).unwrap_or_else(|| {
                warnings.push(format!(
                    "slide {}: unknown kind \"{}\", rendered as bullets",
                    number, name
                ));
                SlideKind::Bullets
            }),
            None => {
                warnings.push(format!("slide {}: missing kind, rendered as bullets", number));
                SlideKind::Bullets
            }
        };

        let mut heading = field(map, keys::HEADING)
            .and_then(as_text)
            .map(|h| self.cleaner.clean_line(&h))
            .unwrap_or_default();
        if heading.is_empty() && kind == SlideKind::Title {
            heading = deck_title.to_string();
        }

        let mut body = match field(map, keys::BODY) {
            Some(value) => self.coerce_body(value, number, warnings),
            None => Vec::new(),
        };

        let (image_ref, image_caption) = field(map, keys::IMAGE)
            .map(|v| self.coerce_image(v))
            .unwrap_or((None, None));

        let mut subtitle = field(map, keys::SUBTITLE)
            .and_then(as_text)
            .map(|s| self.cleaner.clean_line(&s))
            .filter(|s| !s.is_empty());

        let mut section_no = field(map, keys::SECTION_NO).and_then(as_number);

        let notes = field(map, keys::NOTES)
            .and_then(as_text)
            .map(|n| self.cleaner.clean_block(&n))
            .filter(|n| !n.is_empty());

        match kind {
            SlideKind::Title | SlideKind::SectionHeader if !body.is_empty() => {
                if subtitle.is_none() {
                    subtitle = Some(body.remove(0));
                }
                if !body.is_empty() {
                    warnings.push(format!(
                        "slide {}: {} body line(s) ignored on {} slide",
                        number,
                        body.len(),
                        kind.as_str()
                    ));
                }
                body.clear();
            }
            SlideKind::ImageText if body.is_empty() => {
                if let Some(caption) = image_caption {
                    body.push(caption);
                }
            }
            SlideKind::ImageText if body.len() > 1 => {
                warnings.push(format!(
                    "slide {}: {} body line(s) after the caption ignored on {} slide",
                    number,
                    body.len() - 1,
                    kind.as_str()
                ));
                body.truncate(1);
            }
            _ => {}
        }

        if kind == SlideKind::SectionHeader {
            let (number_prefix, stripped) = split_section_number(&heading);
            heading = stripped;
            section_no = section_no.or(number_prefix);
        }

        let slide = SlideSpec {
            kind,
            heading,
            body,
            image_ref: if kind == SlideKind::ImageText {
                image_ref
            } else {
                None
            },
            subtitle,
            section_no: if kind == SlideKind::SectionHeader {
                section_no
            } else {
                None
            },
            notes,
        };

        slide.check().map_err(str::to_string)?;
        Ok(slide)
    }

    /// Turn a body value (list, string, or null) into cleaned bullet lines.
    fn coerce_body(&self, value: &Value, number: usize, warnings: &mut Vec<String>) -> Vec<String> {
        match value {
            Value::Array(items) => {
                let mut lines = Vec::with_capacity(items.len());
                for item in items {
                    match body_item_text(item) {
                        Some(text) => {
                            let line = self.cleaner.clean_body_line(&text);
                            if !line.is_empty() {
                                lines.push(line);
                            }
                        }
                        None => warnings.push(format!(
                            "slide {}: skipped body item that is not text",
                            number
                        )),
                    }
                }
                lines
            }
            Value::String(text) => self.cleaner.split_body(text),
            Value::Number(n) => vec![n.to_string()],
            Value::Null => Vec::new(),
            _ => {
                warnings.push(format!("slide {}: body is not a list, ignored", number));
                Vec::new()
            }
        }
    }

    /// Pull an image reference (and possibly a caption) out of an image value.
    ///
    /// Accepts a string, an object with a `url`-like key, or a list of
    /// either, in which case the first usable entry wins.
    fn coerce_image(&self, value: &Value) -> (Option<String>, Option<String>) {
        match value {
            Value::String(s) => {
                let s = s.trim();
                ((!s.is_empty()).then(|| s.to_string()), None)
            }
            Value::Object(map) => {
                let url = field(map, keys::IMAGE_URL)
                    .and_then(as_text)
                    .map(|u| u.trim().to_string())
                    .filter(|u| !u.is_empty());
                let caption = field(map, keys::IMAGE_CAPTION)
                    .and_then(as_text)
                    .map(|c| self.cleaner.clean_line(&c))
                    .filter(|c| !c.is_empty());
                (url, caption)
            }
            Value::Array(items) => items
                .iter()
                .map(|item| self.coerce_image(item))
                .find(|(url, _)| url.is_some())
                .unwrap_or((None, None)),
            _ => (None, None),
        }
    }
}

/// Parse raw model output with the default parser.
pub fn parse(raw_text: &str) -> Result<Validated, SchemaError> {
    OutlineParser::new().parse(raw_text)
}

/// Find the first balanced `{ ... }` block in the text.
///
/// Braces inside JSON string literals are ignored. If the block starting at
/// the first `{` never closes, the scan restarts at the next `{`.
pub fn extract_structure(raw_text: &str) -> Option<&str> {
    let mut search_from = 0;
    while let Some(offset) = raw_text[search_from..].find('{') {
        let start = search_from + offset;
        if let Some(len) = balanced_len(&raw_text.as_bytes()[start..]) {
            return Some(&raw_text[start..start + len]);
        }
        search_from = start + 1;
    }
    None
}

/// Length of the balanced object at the start of `bytes`, if it closes.
fn balanced_len(bytes: &[u8]) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Normalize a key for loose matching.
fn key_form(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Look up the first present field among `names`.
fn field<'a>(map: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| {
        map.iter()
            .find(|(key, value)| key_form(key) == *name && !value.is_null())
            .map(|(_, value)| value)
    })
}

/// Read a scalar as text.
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a small non-negative integer, from a number or numeric string.
fn as_number(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Text of one body list item: a scalar, or an object like `{title, desc}`.
fn body_item_text(item: &Value) -> Option<String> {
    match item {
        Value::Object(map) => {
            let text = field(map, keys::ITEM_TEXT).and_then(as_text)?;
            match field(map, keys::ITEM_DETAIL).and_then(as_text) {
                Some(detail) if !detail.trim().is_empty() => {
                    Some(format!("**{}**: {}", text.trim(), detail.trim()))
                }
                _ => Some(text),
            }
        }
        other => as_text(other),
    }
}
