//! Instruction prompt sent to the model.
//!
//! The prompt describes the outline JSON the validator understands. The
//! validator does not trust the model to follow it.

/// Schema description embedded in every prompt.
const SCHEMA_GUIDE: &str = r#"Respond with ONE JSON object and nothing else:

{
  "title": "Deck title",
  "author": "Presenter name",
  "slides": [
    {"kind": "title", "heading": "Deck title", "subtitle": "Optional date or byline"},
    {"kind": "section_header", "heading": "Section name", "section_no": 1},
    {"kind": "bullets", "heading": "Slide heading", "body": ["Point one", "Point two"]},
    {"kind": "image_text", "heading": "Slide heading", "body": ["Caption"], "image_ref": "asset-name.png"}
  ]
}

Rules:
- "kind" is one of: title, bullets, image_text, section_header.
- Start with exactly one "title" slide.
- Every "bullets" slide has 2 to 6 short body lines; bullets are not nested.
- Use "image_text" only when you can name a concrete image asset.
- Mark key phrases with **bold** or [[highlight]] sparingly.
- Any slide may carry "notes" with speaker notes.
- Do not wrap the JSON in code fences and do not add commentary."#;

/// Build the prompt asking the model for an outline about `topic`.
pub fn outline_prompt(topic: &str) -> String {
    let mut prompt = String::with_capacity(SCHEMA_GUIDE.len() + topic.len() + 128);
    prompt.push_str("You are preparing a slide presentation.\n\n");
    prompt.push_str(SCHEMA_GUIDE);
    prompt.push_str("\n\nTopic and source material:\n---\n");
    prompt.push_str(topic.trim());
    prompt.push_str("\n---\n");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_topic_and_kinds() {
        let prompt = outline_prompt("  Rust adoption at scale \n");

        assert!(prompt.contains("---\nRust adoption at scale\n---"));
        for kind in ["title", "bullets", "image_text", "section_header"] {
            assert!(prompt.contains(kind), "missing kind {}", kind);
        }
    }

    #[test]
    fn test_prompt_example_parses() {
        // The embedded example must itself satisfy the validator.
        let validated = crate::validate::parse(SCHEMA_GUIDE).unwrap();
        assert_eq!(validated.outline.slides().len(), 4);
        assert!(validated.warnings.is_empty());
    }
}
