//! OOXML package writer.
//!
//! Part layout:
//! ```text
//! [Content_Types].xml
//! _rels/.rels
//! docProps/{core,app}.xml
//! ppt/presentation.xml (+ _rels, presProps, viewProps, tableStyles)
//! ppt/slideMasters/slideMaster1.xml, ppt/slideLayouts/slideLayoutN.xml
//! ppt/theme/theme1.xml (theme2.xml for the notes master)
//! ppt/notesMasters/notesMaster1.xml, ppt/notesSlides/notesSlideN.xml
//! ppt/slides/slideN.xml
//! ppt/media/imageN.ext
//! ```

use crate::assets::ImageFormat;
use crate::document::{write_notes_xml, write_slide_xml, DocumentBuilder};
use crate::layout::{Layout, SLIDE_HEIGHT, SLIDE_WIDTH};
use crate::templates;
use crate::xml::{XmlWriter, NS_A, NS_P, NS_R};
use crate::Result;
use deck_core::RenderError;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

const NS_PACKAGE_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

mod rel_type {
    const BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

    pub fn of(kind: &str) -> String {
        format!("{}/{}", BASE, kind)
    }

    pub const CORE_PROPS: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
}

mod content_type {
    pub const RELS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
    pub const PRESENTATION: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
    pub const SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
    pub const SLIDE_MASTER: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
    pub const SLIDE_LAYOUT: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
    pub const NOTES_MASTER: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.notesMaster+xml";
    pub const NOTES_SLIDE: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml";
    pub const THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
    pub const PRES_PROPS: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml";
    pub const VIEW_PROPS: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml";
    pub const TABLE_STYLES: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml";
    pub const CORE_PROPS: &str = "application/vnd.openxmlformats-package.core-properties+xml";
    pub const APP_PROPS: &str =
        "application/vnd.openxmlformats-officedocument.extended-properties+xml";
}

/// First `<p:sldId>` value; lower ids are reserved.
const FIRST_SLIDE_ID: usize = 256;

/// A relationship entry: id, type URI, target.
struct Rel {
    id: String,
    kind: String,
    target: String,
}

impl Rel {
    fn new(id: impl Into<String>, kind: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            target: target.into(),
        }
    }
}

fn relationships_xml(rels: &[Rel]) -> Result<String> {
    let mut w = XmlWriter::with_declaration()?;
    w.start("Relationships", &[("xmlns", NS_PACKAGE_RELS)])?;
    for rel in rels {
        w.empty(
            "Relationship",
            &[("Id", rel.id.as_str()), ("Type", rel.kind.as_str()), ("Target", rel.target.as_str())],
        )?;
    }
    w.end("Relationships")?;
    w.into_string()
}

/// Zip container with fixed entry timestamps.
struct PackageWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: FileOptions,
}

impl PackageWriter {
    fn new() -> Self {
        let options = FileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options,
        }
    }

    fn part(&mut self, name: &str, contents: &[u8]) -> Result<()> {
        self.zip
            .start_file(name, self.options)
            .map_err(|e| RenderError::Zip(format!("{}: {}", name, e)))?;
        self.zip.write_all(contents)?;
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>> {
        let cursor = self
            .zip
            .finish()
            .map_err(|e| RenderError::Zip(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}

/// Where each slide's notes part lives, if it has one.
fn notes_numbers(doc: &DocumentBuilder<'_>) -> Vec<Option<usize>> {
    let mut next = 0;
    doc.slides()
        .iter()
        .map(|slide| {
            slide.notes.as_ref().map(|_| {
                next += 1;
                next
            })
        })
        .collect()
}

fn media_name(index: usize, format: ImageFormat) -> String {
    format!("image{}.{}", index + 1, format.extension())
}

/// Serialize a document into PPTX bytes.
pub(crate) fn write_package(doc: &DocumentBuilder<'_>) -> Result<Vec<u8>> {
    let notes = notes_numbers(doc);
    let has_notes = notes.iter().any(Option::is_some);
    let mut pkg = PackageWriter::new();

    pkg.part("[Content_Types].xml", content_types_xml(doc, &notes)?.as_bytes())?;
    pkg.part("_rels/.rels", package_rels_xml()?.as_bytes())?;
    pkg.part("docProps/core.xml", core_props_xml(doc)?.as_bytes())?;
    pkg.part("docProps/app.xml", app_props_xml(doc, &notes)?.as_bytes())?;

    pkg.part("ppt/presentation.xml", presentation_xml(doc, has_notes)?.as_bytes())?;
    pkg.part(
        "ppt/_rels/presentation.xml.rels",
        presentation_rels_xml(doc, has_notes)?.as_bytes(),
    )?;
    pkg.part("ppt/presProps.xml", templates::PRES_PROPS.as_bytes())?;
    pkg.part("ppt/viewProps.xml", templates::VIEW_PROPS.as_bytes())?;
    pkg.part("ppt/tableStyles.xml", templates::TABLE_STYLES.as_bytes())?;
    pkg.part("ppt/theme/theme1.xml", templates::theme_xml("Deck Theme")?.as_bytes())?;

    pkg.part(
        "ppt/slideMasters/slideMaster1.xml",
        templates::slide_master_xml()?.as_bytes(),
    )?;
    let mut master_rels: Vec<Rel> = Layout::ALL
        .iter()
        .enumerate()
        .map(|(i, layout)| {
            Rel::new(
                format!("rId{}", i + 1),
                rel_type::of("slideLayout"),
                format!("../slideLayouts/slideLayout{}.xml", layout.part_number()),
            )
        })
        .collect();
    master_rels.push(Rel::new(
        templates::master_theme_rel_id(),
        rel_type::of("theme"),
        "../theme/theme1.xml",
    ));
    pkg.part(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        relationships_xml(&master_rels)?.as_bytes(),
    )?;

    let layout_rels = relationships_xml(&[Rel::new(
        "rId1",
        rel_type::of("slideMaster"),
        "../slideMasters/slideMaster1.xml",
    )])?;
    for layout in Layout::ALL {
        let n = layout.part_number();
        pkg.part(
            &format!("ppt/slideLayouts/slideLayout{}.xml", n),
            templates::slide_layout_xml(layout)?.as_bytes(),
        )?;
        pkg.part(
            &format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", n),
            layout_rels.as_bytes(),
        )?;
    }

    if has_notes {
        pkg.part("ppt/theme/theme2.xml", templates::theme_xml("Notes Theme")?.as_bytes())?;
        pkg.part(
            "ppt/notesMasters/notesMaster1.xml",
            templates::notes_master_xml()?.as_bytes(),
        )?;
        pkg.part(
            "ppt/notesMasters/_rels/notesMaster1.xml.rels",
            relationships_xml(&[Rel::new("rId1", rel_type::of("theme"), "../theme/theme2.xml")])?
                .as_bytes(),
        )?;
    }

    for (i, slide) in doc.slides().iter().enumerate() {
        let n = i + 1;
        let mut rels = vec![Rel::new(
            "rId1",
            rel_type::of("slideLayout"),
            format!("../slideLayouts/slideLayout{}.xml", slide.layout.part_number()),
        )];
        for media in slide.media() {
            let format = doc.media()[media].format;
            rels.push(Rel::new(
                format!("rId{}", rels.len() + 1),
                rel_type::of("image"),
                format!("../media/{}", media_name(media, format)),
            ));
        }

        if let (Some(notes_no), Some(text)) = (notes[i], slide.notes.as_deref()) {
            rels.push(Rel::new(
                format!("rId{}", rels.len() + 1),
                rel_type::of("notesSlide"),
                format!("../notesSlides/notesSlide{}.xml", notes_no),
            ));
            pkg.part(
                &format!("ppt/notesSlides/notesSlide{}.xml", notes_no),
                write_notes_xml(text)?.as_bytes(),
            )?;
            pkg.part(
                &format!("ppt/notesSlides/_rels/notesSlide{}.xml.rels", notes_no),
                relationships_xml(&[
                    Rel::new("rId1", rel_type::of("notesMaster"), "../notesMasters/notesMaster1.xml"),
                    Rel::new("rId2", rel_type::of("slide"), format!("../slides/slide{}.xml", n)),
                ])?
                .as_bytes(),
            )?;
        }

        pkg.part(&format!("ppt/slides/slide{}.xml", n), write_slide_xml(slide)?.as_bytes())?;
        pkg.part(
            &format!("ppt/slides/_rels/slide{}.xml.rels", n),
            relationships_xml(&rels)?.as_bytes(),
        )?;
    }

    for (i, media) in doc.media().iter().enumerate() {
        pkg.part(&format!("ppt/media/{}", media_name(i, media.format)), &media.bytes)?;
    }

    pkg.finish()
}

fn content_types_xml(doc: &DocumentBuilder<'_>, notes: &[Option<usize>]) -> Result<String> {
    let mut w = XmlWriter::with_declaration()?;
    w.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
    w.empty("Default", &[("Extension", "rels"), ("ContentType", content_type::RELS)])?;
    w.empty("Default", &[("Extension", "xml"), ("ContentType", content_type::XML)])?;
    for format in ImageFormat::all() {
        w.empty(
            "Default",
            &[("Extension", format.extension()), ("ContentType", format.content_type())],
        )?;
    }

    let mut overrides: Vec<(String, &str)> = vec![
        ("/ppt/presentation.xml".into(), content_type::PRESENTATION),
        ("/ppt/presProps.xml".into(), content_type::PRES_PROPS),
        ("/ppt/viewProps.xml".into(), content_type::VIEW_PROPS),
        ("/ppt/tableStyles.xml".into(), content_type::TABLE_STYLES),
        ("/ppt/theme/theme1.xml".into(), content_type::THEME),
        ("/ppt/slideMasters/slideMaster1.xml".into(), content_type::SLIDE_MASTER),
    ];
    for layout in Layout::ALL {
        overrides.push((
            format!("/ppt/slideLayouts/slideLayout{}.xml", layout.part_number()),
            content_type::SLIDE_LAYOUT,
        ));
    }
    for n in 1..=doc.slide_count() {
        overrides.push((format!("/ppt/slides/slide{}.xml", n), content_type::SLIDE));
    }
    if notes.iter().any(Option::is_some) {
        overrides.push(("/ppt/theme/theme2.xml".into(), content_type::THEME));
        overrides.push(("/ppt/notesMasters/notesMaster1.xml".into(), content_type::NOTES_MASTER));
    }
    for n in notes.iter().flatten() {
        overrides.push((format!("/ppt/notesSlides/notesSlide{}.xml", n), content_type::NOTES_SLIDE));
    }
    overrides.push(("/docProps/core.xml".into(), content_type::CORE_PROPS));
    overrides.push(("/docProps/app.xml".into(), content_type::APP_PROPS));

    for (part, ty) in &overrides {
        w.empty("Override", &[("PartName", part.as_str()), ("ContentType", *ty)])?;
    }
    w.end("Types")?;
    w.into_string()
}

fn package_rels_xml() -> Result<String> {
    relationships_xml(&[
        Rel::new("rId1", rel_type::of("officeDocument"), "ppt/presentation.xml"),
        Rel::new("rId2", rel_type::CORE_PROPS, "docProps/core.xml"),
        Rel::new("rId3", rel_type::of("extended-properties"), "docProps/app.xml"),
    ])
}

/// Relationship id of slide `index` (0-based) from the presentation part.
fn slide_rel_id(index: usize, has_notes: bool) -> String {
    let fixed = if has_notes { 6 } else { 5 };
    format!("rId{}", fixed + index + 1)
}

fn presentation_rels_xml(doc: &DocumentBuilder<'_>, has_notes: bool) -> Result<String> {
    let mut rels = vec![
        Rel::new("rId1", rel_type::of("slideMaster"), "slideMasters/slideMaster1.xml"),
        Rel::new("rId2", rel_type::of("theme"), "theme/theme1.xml"),
        Rel::new("rId3", rel_type::of("presProps"), "presProps.xml"),
        Rel::new("rId4", rel_type::of("viewProps"), "viewProps.xml"),
        Rel::new("rId5", rel_type::of("tableStyles"), "tableStyles.xml"),
    ];
    if has_notes {
        rels.push(Rel::new("rId6", rel_type::of("notesMaster"), "notesMasters/notesMaster1.xml"));
    }
    for i in 0..doc.slide_count() {
        rels.push(Rel::new(
            slide_rel_id(i, has_notes),
            rel_type::of("slide"),
            format!("slides/slide{}.xml", i + 1),
        ));
    }
    relationships_xml(&rels)
}

fn presentation_xml(doc: &DocumentBuilder<'_>, has_notes: bool) -> Result<String> {
    let mut w = XmlWriter::with_declaration()?;
    w.start(
        "p:presentation",
        &[
            ("xmlns:a", NS_A),
            ("xmlns:r", NS_R),
            ("xmlns:p", NS_P),
            ("saveSubsetFonts", "1"),
        ],
    )?;

    w.start("p:sldMasterIdLst", &[])?;
    w.empty("p:sldMasterId", &[("id", "2147483648"), ("r:id", "rId1")])?;
    w.end("p:sldMasterIdLst")?;

    if has_notes {
        w.start("p:notesMasterIdLst", &[])?;
        w.empty("p:notesMasterId", &[("r:id", "rId6")])?;
        w.end("p:notesMasterIdLst")?;
    }

    if doc.slide_count() > 0 {
        w.start("p:sldIdLst", &[])?;
        for i in 0..doc.slide_count() {
            let id = (FIRST_SLIDE_ID + i).to_string();
            let rel = slide_rel_id(i, has_notes);
            w.empty("p:sldId", &[("id", &id), ("r:id", &rel)])?;
        }
        w.end("p:sldIdLst")?;
    }

    let (cx, cy) = (SLIDE_WIDTH.to_string(), SLIDE_HEIGHT.to_string());
    w.empty("p:sldSz", &[("cx", &cx), ("cy", &cy)])?;
    let (ncx, ncy) = (templates::NOTES_WIDTH.to_string(), templates::NOTES_HEIGHT.to_string());
    w.empty("p:notesSz", &[("cx", &ncx), ("cy", &ncy)])?;

    w.start("p:defaultTextStyle", &[])?;
    w.start("a:defPPr", &[])?;
    w.empty("a:defRPr", &[("lang", "en-US")])?;
    w.end("a:defPPr")?;
    w.end("p:defaultTextStyle")?;

    w.end("p:presentation")?;
    w.into_string()
}

fn core_props_xml(doc: &DocumentBuilder<'_>) -> Result<String> {
    let mut w = XmlWriter::with_declaration()?;
    w.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:dcmitype", "http://purl.org/dc/dcmitype/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    w.text_element("dc:title", &[], doc.title())?;
    w.text_element("dc:creator", &[], doc.author())?;
    w.text_element("cp:lastModifiedBy", &[], doc.author())?;
    w.text_element("cp:revision", &[], "1")?;
    if let Some(created) = doc.created() {
        let stamp = created.format("%Y-%m-%dT%H:%M:%SZ").to_string();
        w.text_element("dcterms:created", &[("xsi:type", "dcterms:W3CDTF")], &stamp)?;
        w.text_element("dcterms:modified", &[("xsi:type", "dcterms:W3CDTF")], &stamp)?;
    }
    w.end("cp:coreProperties")?;
    w.into_string()
}

fn app_props_xml(doc: &DocumentBuilder<'_>, notes: &[Option<usize>]) -> Result<String> {
    let mut w = XmlWriter::with_declaration()?;
    w.start(
        "Properties",
        &[
            (
                "xmlns",
                "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
            ),
            (
                "xmlns:vt",
                "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes",
            ),
        ],
    )?;
    w.text_element("Application", &[], concat!("deck-pptx ", env!("CARGO_PKG_VERSION")))?;
    w.text_element("PresentationFormat", &[], "Custom")?;
    w.text_element("Slides", &[], &doc.slide_count().to_string())?;
    w.text_element("Notes", &[], &notes.iter().flatten().count().to_string())?;
    w.text_element("HiddenSlides", &[], "0")?;
    w.end("Properties")?;
    w.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render;
    use deck_core::SlideSpec;
    use std::io::Read;
    use zip::ZipArchive;

    fn read_part(bytes: &[u8], name: &str) -> Option<String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).ok()?;
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        Some(out)
    }

    fn two_slide_doc() -> DocumentBuilder<'static> {
        let mut doc = DocumentBuilder::new();
        doc.set_title("Roadmap");
        render(&SlideSpec::title("Roadmap"), &mut doc);
        render(
            &SlideSpec::bullets("Goals", ["Grow", "Retain"]).with_notes("Keep it short"),
            &mut doc,
        );
        doc
    }

    #[test]
    fn test_package_has_required_parts() {
        let bytes = two_slide_doc().finish().unwrap();
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/core.xml",
            "docProps/app.xml",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout4.xml",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/notesMasters/notesMaster1.xml",
            "ppt/notesSlides/notesSlide1.xml",
        ] {
            assert!(read_part(&bytes, part).is_some(), "missing {}", part);
        }
        assert!(read_part(&bytes, "ppt/slides/slide3.xml").is_none());
    }

    #[test]
    fn test_notes_linked_from_slide() {
        let bytes = two_slide_doc().finish().unwrap();
        let rels = read_part(&bytes, "ppt/slides/_rels/slide2.xml.rels").unwrap();
        assert!(rels.contains("Target=\"../notesSlides/notesSlide1.xml\""));
        let rels = read_part(&bytes, "ppt/slides/_rels/slide1.xml.rels").unwrap();
        assert!(!rels.contains("notesSlide"));
        assert!(rels.contains("Target=\"../slideLayouts/slideLayout1.xml\""));
    }

    #[test]
    fn test_presentation_rel_ids_shift_with_notes() {
        assert_eq!(slide_rel_id(0, false), "rId6");
        assert_eq!(slide_rel_id(0, true), "rId7");

        let bytes = two_slide_doc().finish().unwrap();
        let pres = read_part(&bytes, "ppt/presentation.xml").unwrap();
        assert!(pres.contains("<p:sldId id=\"256\" r:id=\"rId7\"/>"));
        assert!(pres.contains("<p:sldId id=\"257\" r:id=\"rId8\"/>"));
        assert!(pres.contains("<p:notesMasterId r:id=\"rId6\"/>"));
    }

    #[test]
    fn test_no_notes_master_without_notes() {
        let mut doc = DocumentBuilder::new();
        render(&SlideSpec::title("Only"), &mut doc);
        let bytes = doc.finish().unwrap();
        assert!(read_part(&bytes, "ppt/notesMasters/notesMaster1.xml").is_none());
        let types = read_part(&bytes, "[Content_Types].xml").unwrap();
        assert!(!types.contains("notesMaster"));
    }

    #[test]
    fn test_core_props_without_dates_by_default() {
        let bytes = two_slide_doc().finish().unwrap();
        let core = read_part(&bytes, "docProps/core.xml").unwrap();
        assert!(core.contains("<dc:title>Roadmap</dc:title>"));
        assert!(core.contains("<dc:creator>Unknown Author</dc:creator>"));
        assert!(!core.contains("dcterms:created"));
    }

    #[test]
    fn test_output_is_reproducible() {
        let a = two_slide_doc().finish().unwrap();
        let b = two_slide_doc().finish().unwrap();
        assert_eq!(a, b);
    }
}
