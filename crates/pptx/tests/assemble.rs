mod common;

use common::{relationships, Deck};
use deck_core::{parse, Outline, SlideSpec};
use deck_pptx::{assemble, Assembler, MemoryAssets};

/// A 1x1 PNG.
const PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

fn sample_outline() -> Outline {
    Outline::new(
        "Rust Adoption",
        "Platform Team",
        vec![
            SlideSpec::title("Rust Adoption").with_subtitle("Q3 update"),
            SlideSpec::section("Why Rust").with_section_no(1),
            SlideSpec::bullets("Benefits", ["Memory safety", "**Fearless** concurrency"]),
            SlideSpec::image_text("Architecture", "Services after migration", "arch.png"),
            SlideSpec::bullets("Next Steps", ["Train teams", "Migrate [[billing]]"])
                .with_notes("Ask for budget"),
        ],
    )
    .unwrap()
}

#[test]
fn test_slide_count_matches_outline() {
    let outline = sample_outline();
    let mut deck = Deck::open(assemble(&outline).unwrap());

    assert_eq!(deck.slide_paths().len(), outline.slides().len());
    for n in 1..=outline.slides().len() {
        assert!(deck.has_part(&format!("ppt/slides/slide{}.xml", n)));
    }
    assert!(!deck.has_part(&format!("ppt/slides/slide{}.xml", outline.slides().len() + 1)));
}

#[test]
fn test_slide_order_preserved() {
    let outline = sample_outline();
    let mut deck = Deck::open(assemble(&outline).unwrap());

    let paths = deck.slide_paths();
    for (spec, path) in outline.slides().iter().zip(&paths) {
        let paragraphs = deck.paragraphs(path);
        assert!(
            paragraphs.iter().any(|p| p == &spec.heading),
            "{} should show '{}', got {:?}",
            path,
            spec.heading,
            paragraphs
        );
    }
}

#[test]
fn test_core_properties_carry_title_and_author() {
    let mut deck = Deck::open(assemble(&sample_outline()).unwrap());
    let core = deck.part("docProps/core.xml");

    assert!(core.contains("<dc:title>Rust Adoption</dc:title>"));
    assert!(core.contains("<dc:creator>Platform Team</dc:creator>"));
}

#[test]
fn test_markup_becomes_plain_run_text() {
    let mut deck = Deck::open(assemble(&sample_outline()).unwrap());
    let paragraphs = deck.paragraphs("ppt/slides/slide3.xml");

    assert!(paragraphs.contains(&"Fearless concurrency".to_string()));
    assert!(!paragraphs.iter().any(|p| p.contains("**")));
}

#[test]
fn test_unresolved_image_gets_placeholder() {
    let assembly = Assembler::new().assemble(&sample_outline()).unwrap();
    assert_eq!(assembly.warnings.len(), 1);

    let mut deck = Deck::open(assembly.bytes);
    let paragraphs = deck.paragraphs("ppt/slides/slide4.xml");
    assert!(paragraphs.contains(&"Image unavailable".to_string()));
    assert!(paragraphs.contains(&"Services after migration".to_string()));
    assert!(!deck.has_part("ppt/media/image1.png"));
}

#[test]
fn test_resolved_image_is_packaged() {
    let assembly = Assembler::new()
        .with_resolver(MemoryAssets::new().with("arch.png", PNG.to_vec()))
        .assemble(&sample_outline())
        .unwrap();
    assert!(assembly.warnings.is_empty());

    let mut deck = Deck::open(assembly.bytes);
    assert!(deck.has_part("ppt/media/image1.png"));
    let rels = relationships(&deck.part("ppt/slides/_rels/slide4.xml.rels"));
    assert!(rels.contains(&("rId2".to_string(), "../media/image1.png".to_string())));
    assert!(deck.part("[Content_Types].xml").contains("Extension=\"png\""));
}

#[test]
fn test_notes_slide_written() {
    let mut deck = Deck::open(assemble(&sample_outline()).unwrap());

    let rels = relationships(&deck.part("ppt/slides/_rels/slide5.xml.rels"));
    assert!(rels
        .iter()
        .any(|(_, target)| target == "../notesSlides/notesSlide1.xml"));
    assert_eq!(
        deck.paragraphs("ppt/notesSlides/notesSlide1.xml"),
        vec!["Ask for budget".to_string()]
    );
}

#[test]
fn test_every_slide_references_a_layout() {
    let mut deck = Deck::open(assemble(&sample_outline()).unwrap());
    let expected = [1, 3, 2, 4, 2];

    for (i, layout) in expected.iter().enumerate() {
        let rels = relationships(&deck.part(&format!("ppt/slides/_rels/slide{}.xml.rels", i + 1)));
        assert_eq!(
            rels[0],
            ("rId1".to_string(), format!("../slideLayouts/slideLayout{}.xml", layout))
        );
    }
}

#[test]
fn test_model_output_to_deck() {
    let raw = r#"Here you go:
```json
{
  "title": "Team Offsite",
  "slides": [
    {"kind": "title", "heading": "Team Offsite", "body": ["June 2025"]},
    {"kind": "bullets", "heading": "Agenda", "body": ["- Kickoff", "- Workshops"]},
    {"kind": "image_text", "heading": "Venue", "body": ["Lakeside lodge"]}
  ]
}
```
Let me know if you want changes."#;

    let validated = parse(raw).unwrap();
    assert_eq!(validated.outline.slides().len(), 2);

    let mut deck = Deck::open(assemble(&validated.outline).unwrap());
    assert_eq!(deck.slide_paths().len(), 2);
    assert_eq!(
        deck.paragraphs("ppt/slides/slide2.xml"),
        vec!["Agenda".to_string(), "Kickoff".to_string(), "Workshops".to_string()]
    );
    assert_eq!(
        deck.paragraphs("ppt/slides/slide1.xml"),
        vec!["Team Offsite".to_string(), "June 2025".to_string()]
    );
}

#[test]
fn test_assembly_is_reproducible() {
    let outline = sample_outline();
    assert_eq!(assemble(&outline).unwrap(), assemble(&outline).unwrap());
}

/// Characters outside the XML 1.0 `Char` production.
fn illegal_xml_chars(xml: &str) -> Vec<u32> {
    xml.chars()
        .filter(|&c| {
            (c < ' ' && !matches!(c, '\t' | '\n' | '\r')) || matches!(c, '\u{FFFE}' | '\u{FFFF}')
        })
        .map(u32::from)
        .collect()
}

#[test]
fn test_escaped_control_characters_never_reach_xml() {
    let raw = r#"{"title": "Ops\u0007 Review", "slides": [
        {"kind": "bullets", "heading": "Q\u0001A", "body": ["line\u000bbreak"], "notes": "say\u0002 hi"}
    ]}"#;
    let validated = parse(raw).unwrap();
    let mut deck = Deck::open(assemble(&validated.outline).unwrap());

    for part in [
        "ppt/slides/slide1.xml",
        "ppt/notesSlides/notesSlide1.xml",
        "docProps/core.xml",
    ] {
        let xml = deck.part(part);
        assert!(illegal_xml_chars(&xml).is_empty(), "{}: {:?}", part, illegal_xml_chars(&xml));
    }
    assert_eq!(
        deck.paragraphs("ppt/slides/slide1.xml"),
        vec!["QA".to_string(), "line break".to_string()]
    );
    assert!(deck.part("docProps/core.xml").contains("<dc:title>Ops Review</dc:title>"));
}

#[test]
fn test_hand_built_outline_is_sanitized_on_write() {
    let outline = Outline::new(
        "Deck\u{1}",
        "Ops",
        vec![SlideSpec::bullets("Raw\u{8} heading", ["bell\u{7}"]).with_notes("tab\u{0B}stop")],
    )
    .unwrap();
    let mut deck = Deck::open(assemble(&outline).unwrap());

    for part in ["ppt/slides/slide1.xml", "ppt/notesSlides/notesSlide1.xml", "docProps/core.xml"] {
        assert!(illegal_xml_chars(&deck.part(part)).is_empty(), "{}", part);
    }
    assert_eq!(
        deck.paragraphs("ppt/slides/slide1.xml"),
        vec!["Raw heading".to_string(), "bell".to_string()]
    );
}
