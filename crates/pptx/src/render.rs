//! Slide renderer: maps one [`SlideSpec`] onto its layout.

use crate::document::{
    Align, Anchor, DocumentBuilder, Paragraph, PictureShape, RenderedSlide, Shape, SlideContent,
    TextShape,
};
use crate::layout::{color, frames, size, Layout, Slot};
use deck_core::{SlideKind, SlideSpec};

/// Label shown in place of an image that could not be embedded.
pub const IMAGE_PLACEHOLDER_LABEL: &str = "Image unavailable";

/// Append `slide` to `document` and return its handle.
///
/// Never fails: content problems such as an unresolvable image are recorded
/// as warnings on the builder.
pub fn render(slide: &SlideSpec, document: &mut DocumentBuilder<'_>) -> RenderedSlide {
    let number = document.slide_count() + 1;
    let layout = Layout::for_kind(slide.kind);

    let shapes = match slide.kind {
        SlideKind::Title => title_shapes(slide),
        SlideKind::SectionHeader => section_shapes(slide),
        SlideKind::Bullets => bullet_shapes(slide),
        SlideKind::ImageText => image_text_shapes(slide, number, document),
    };

    log::debug!(
        "Rendered slide {} ({}) with {} shapes",
        number,
        slide.kind.as_str(),
        shapes.len()
    );

    document.push_slide(SlideContent {
        name: format!("Slide_{}_{}", number, slide.kind.as_str()),
        layout,
        shapes,
        notes: slide.notes.clone(),
    })
}

fn title_shapes(slide: &SlideSpec) -> Vec<Shape> {
    let mut shapes = vec![Shape::Text(
        TextShape::in_slot(
            Slot::CenterTitle,
            frames::DECK_TITLE,
            vec![Paragraph::new(&slide.heading, size::DECK_TITLE)
                .align(Align::Center)
                .bold()],
        )
        .anchored(Anchor::Middle),
    )];

    if let Some(subtitle) = &slide.subtitle {
        shapes.push(Shape::Text(TextShape::in_slot(
            Slot::Subtitle,
            frames::DECK_SUBTITLE,
            vec![Paragraph::new(subtitle, size::SUBTITLE)
                .align(Align::Center)
                .color(color::MUTED)],
        )));
    }
    shapes
}

fn section_shapes(slide: &SlideSpec) -> Vec<Shape> {
    let heading = |frame| {
        Shape::Text(
            TextShape::in_slot(
                Slot::Title,
                frame,
                vec![Paragraph::new(&slide.heading, size::SECTION_TITLE).bold()],
            )
            .anchored(Anchor::Middle),
        )
    };

    let mut shapes = Vec::with_capacity(3);
    match slide.section_no {
        Some(no) => {
            shapes.push(Shape::Text(
                TextShape::text_box(
                    "Section Number",
                    frames::SECTION_NUMBER,
                    vec![Paragraph::new(format!("{:02}", no), size::SECTION_NUMBER)
                        .align(Align::Right)
                        .bold()
                        .color(color::ACCENT)],
                )
                .anchored(Anchor::Middle),
            ));
            shapes.push(heading(frames::SECTION_TITLE_NUMBERED));
        }
        None => shapes.push(heading(frames::SECTION_TITLE)),
    }

    if let Some(subtitle) = &slide.subtitle {
        shapes.push(Shape::Text(TextShape::text_box(
            "Section Subtitle",
            frames::SECTION_SUBTITLE,
            vec![Paragraph::new(subtitle, size::SUBTITLE).color(color::MUTED)],
        )));
    }
    shapes
}

fn slide_title(slide: &SlideSpec) -> Shape {
    Shape::Text(TextShape::in_slot(
        Slot::Title,
        frames::SLIDE_TITLE,
        vec![Paragraph::new(&slide.heading, size::SLIDE_TITLE).bold()],
    ))
}

fn bullet_shapes(slide: &SlideSpec) -> Vec<Shape> {
    let paragraphs = slide
        .body
        .iter()
        .map(|line| Paragraph::new(line, size::BODY).bullet())
        .collect();

    vec![
        slide_title(slide),
        Shape::Text(TextShape::in_slot(Slot::Body, frames::BODY, paragraphs)),
    ]
}

fn image_text_shapes(slide: &SlideSpec, number: usize, document: &mut DocumentBuilder<'_>) -> Vec<Shape> {
    let mut shapes = vec![slide_title(slide)];
    let image_ref = slide.image_ref.as_deref().unwrap_or_default();

    match document.embed_image(image_ref) {
        Ok((media, pixels)) => {
            let frame = match pixels {
                Some((w, h)) => frames::SPLIT_PICTURE.fit(w, h),
                None => frames::SPLIT_PICTURE,
            };
            shapes.push(Shape::Picture(PictureShape {
                frame,
                media,
                description: image_ref.to_string(),
            }));
        }
        Err(reason) => {
            document.warn(format!(
                "slide {}: image '{}' unavailable ({}), using placeholder",
                number, image_ref, reason
            ));
            shapes.push(Shape::Text(
                TextShape::text_box(
                    "Image Placeholder",
                    frames::SPLIT_PICTURE,
                    vec![Paragraph::new(IMAGE_PLACEHOLDER_LABEL, size::CAPTION)
                        .align(Align::Center)
                        .color(color::MUTED)],
                )
                .filled(color::PLACEHOLDER_FILL)
                .anchored(Anchor::Middle),
            ));
        }
    }

    if let Some(caption) = slide.caption().filter(|c| !c.is_empty()) {
        shapes.push(Shape::Text(TextShape::in_slot(
            Slot::Caption,
            frames::SPLIT_CAPTION,
            vec![Paragraph::new(caption, size::CAPTION)],
        )));
    }
    shapes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::tests::TINY_PNG;
    use crate::assets::MemoryAssets;

    #[test]
    fn test_render_appends_one_slide() {
        let mut doc = DocumentBuilder::new();
        let first = render(&SlideSpec::title("Quarterly Review"), &mut doc);
        let second = render(&SlideSpec::bullets("Agenda", ["Intro", "Numbers"]), &mut doc);

        assert_eq!(doc.slide_count(), 2);
        assert_eq!(first.index(), 0);
        assert_eq!(second.index(), 1);
    }

    #[test]
    fn test_bullets_one_paragraph_per_line() {
        let mut doc = DocumentBuilder::new();
        let slide = render(
            &SlideSpec::bullets("Agenda", ["Intro", "Numbers", "Q&A"]),
            &mut doc,
        );
        let xml = doc.slide_xml(&slide).unwrap();

        assert!(xml.contains("<p:cSld name=\"Slide_1_bullets\">"));
        assert_eq!(xml.matches("<a:buChar").count(), 3);
        assert!(xml.contains("<a:t>Q&amp;A</a:t>"));
        assert!(xml.contains("<a:t>Agenda</a:t>"));
    }

    #[test]
    fn test_title_slide_with_subtitle() {
        let mut doc = DocumentBuilder::new();
        let slide = render(
            &SlideSpec::title("Launch Plan").with_subtitle("March 2024"),
            &mut doc,
        );
        let xml = doc.slide_xml(&slide).unwrap();

        assert!(xml.contains("<p:ph type=\"ctrTitle\"/>"));
        assert!(xml.contains("<p:ph type=\"subTitle\" idx=\"1\"/>"));
        assert!(xml.contains("<a:t>March 2024</a:t>"));
    }

    #[test]
    fn test_section_number_beside_heading() {
        let mut doc = DocumentBuilder::new();
        let slide = render(&SlideSpec::section("Results").with_section_no(2), &mut doc);
        let xml = doc.slide_xml(&slide).unwrap();

        assert!(xml.contains("<a:t>02</a:t>"));
        assert!(xml.contains("<p:cNvSpPr txBox=\"1\"/>"));
        assert!(xml.contains(&format!("<a:off x=\"{}\"", frames::SECTION_TITLE_NUMBERED.x)));
    }

    #[test]
    fn test_missing_image_uses_placeholder() {
        let mut doc = DocumentBuilder::new();
        let slide = render(
            &SlideSpec::image_text("Architecture", "The big picture", "diagram.png"),
            &mut doc,
        );
        let xml = doc.slide_xml(&slide).unwrap();

        assert!(xml.contains(IMAGE_PLACEHOLDER_LABEL));
        assert!(xml.contains(color::PLACEHOLDER_FILL));
        assert!(!xml.contains("<p:pic>"));
        assert!(xml.contains("<a:t>The big picture</a:t>"));
        assert_eq!(doc.warnings().len(), 1);
        assert!(doc.warnings()[0].starts_with("slide 1: image 'diagram.png' unavailable"));
    }

    #[test]
    fn test_resolved_image_is_embedded() {
        let assets = MemoryAssets::new().with("diagram.png", TINY_PNG.to_vec());
        let mut doc = DocumentBuilder::with_resolver(&assets);
        let slide = render(
            &SlideSpec::image_text("Architecture", "", "diagram.png"),
            &mut doc,
        );
        let xml = doc.slide_xml(&slide).unwrap();

        assert!(xml.contains("<p:pic>"));
        assert!(xml.contains("r:embed=\"rId2\""));
        assert!(doc.warnings().is_empty());
        // Square image centered in the picture column
        let fitted = frames::SPLIT_PICTURE.fit(1, 1);
        assert!(xml.contains(&format!("<a:ext cx=\"{}\" cy=\"{}\"/>", fitted.cx, fitted.cy)));
    }

    #[test]
    fn test_render_is_idempotent() {
        let spec = SlideSpec::bullets("Risks", ["**Scope** creep", "[[Hiring]] delays"])
            .with_notes("Mention the backlog");

        let mut a = DocumentBuilder::new();
        let mut b = DocumentBuilder::new();
        let ra = render(&spec, &mut a);
        let rb = render(&spec, &mut b);

        assert_eq!(a.slide_xml(&ra).unwrap(), b.slide_xml(&rb).unwrap());
    }

    #[test]
    fn test_highlight_uses_accent_color() {
        let mut doc = DocumentBuilder::new();
        let slide = render(&SlideSpec::bullets("Focus", ["Watch [[churn]]"]), &mut doc);
        let xml = doc.slide_xml(&slide).unwrap();

        assert!(xml.contains(&format!("<a:srgbClr val=\"{}\"/>", color::ACCENT)));
        assert!(xml.contains("<a:t>churn</a:t>"));
    }
}
