//! In-memory presentation under construction.
//!
//! A [`DocumentBuilder`] owns every slide until [`DocumentBuilder::finish`]
//! consumes it and produces the packaged bytes. Slides are only appended;
//! nothing is reordered or removed.

use crate::assets::{image_size, AssetResolver, ImageFormat, NoAssets};
use crate::layout::{color, Frame, Layout, Slot};
use crate::package;
use crate::xml::{XmlWriter, NS_A, NS_P, NS_R};
use crate::Result;
use chrono::{DateTime, Utc};
use deck_core::markup::{parse_spans, Emphasis};
use deck_core::{DEFAULT_AUTHOR, DEFAULT_TITLE};

static NO_ASSETS: NoAssets = NoAssets;

/// Handle to a slide inside the builder that rendered it.
///
/// Not `Clone`: each rendered slide has exactly one handle.
#[derive(Debug, PartialEq, Eq)]
pub struct RenderedSlide(usize);

impl RenderedSlide {
    /// 0-based position in the deck.
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    fn as_attr(self) -> &'static str {
        match self {
            Align::Left => "l",
            Align::Center => "ctr",
            Align::Right => "r",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Anchor {
    Top,
    Middle,
}

impl Anchor {
    fn as_attr(self) -> &'static str {
        match self {
            Anchor::Top => "t",
            Anchor::Middle => "ctr",
        }
    }
}

/// One paragraph of uniformly styled text. Inline markup is expanded into
/// runs when written.
#[derive(Debug, Clone)]
pub(crate) struct Paragraph {
    pub text: String,
    pub align: Align,
    pub size: u32,
    pub bold: bool,
    pub color: &'static str,
    pub bullet: bool,
}

impl Paragraph {
    pub fn new(text: impl Into<String>, size: u32) -> Self {
        Self {
            text: text.into(),
            align: Align::Left,
            size,
            bold: false,
            color: color::TEXT,
            bullet: false,
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn color(mut self, color: &'static str) -> Self {
        self.color = color;
        self
    }

    pub fn bullet(mut self) -> Self {
        self.bullet = true;
        self
    }
}

#[derive(Debug, Clone)]
pub(crate) struct TextShape {
    pub name: String,
    pub slot: Option<Slot>,
    pub frame: Frame,
    pub fill: Option<&'static str>,
    pub anchor: Anchor,
    pub paragraphs: Vec<Paragraph>,
}

impl TextShape {
    /// A text shape filling a layout placeholder.
    pub fn in_slot(slot: Slot, frame: Frame, paragraphs: Vec<Paragraph>) -> Self {
        Self {
            name: slot.name().to_string(),
            slot: Some(slot),
            frame,
            fill: None,
            anchor: Anchor::Top,
            paragraphs,
        }
    }

    /// A free-standing text box.
    pub fn text_box(name: impl Into<String>, frame: Frame, paragraphs: Vec<Paragraph>) -> Self {
        Self {
            name: name.into(),
            slot: None,
            frame,
            fill: None,
            anchor: Anchor::Top,
            paragraphs,
        }
    }

    pub fn anchored(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn filled(mut self, fill: &'static str) -> Self {
        self.fill = Some(fill);
        self
    }
}

#[derive(Debug, Clone)]
pub(crate) struct PictureShape {
    pub frame: Frame,
    /// Index into the document's media list.
    pub media: usize,
    pub description: String,
}

#[derive(Debug, Clone)]
pub(crate) enum Shape {
    Text(TextShape),
    Picture(PictureShape),
}

/// Everything needed to write one slide part.
#[derive(Debug, Clone)]
pub(crate) struct SlideContent {
    pub name: String,
    pub layout: Layout,
    pub shapes: Vec<Shape>,
    pub notes: Option<String>,
}

impl SlideContent {
    /// Media indices referenced by this slide, in shape order.
    pub fn media(&self) -> impl Iterator<Item = usize> + '_ {
        self.shapes.iter().filter_map(|shape| match shape {
            Shape::Picture(pic) => Some(pic.media),
            Shape::Text(_) => None,
        })
    }
}

/// An embedded image.
#[derive(Debug, Clone)]
pub(crate) struct Media {
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

/// Builder for one presentation document. Single use.
pub struct DocumentBuilder<'r> {
    title: String,
    author: String,
    created: Option<DateTime<Utc>>,
    slides: Vec<SlideContent>,
    media: Vec<Media>,
    resolver: &'r dyn AssetResolver,
    warnings: Vec<String>,
}

impl DocumentBuilder<'static> {
    /// Create an empty document that cannot resolve images.
    pub fn new() -> Self {
        DocumentBuilder::with_resolver(&NO_ASSETS)
    }
}

impl Default for DocumentBuilder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> DocumentBuilder<'r> {
    /// Create an empty document that resolves images through `resolver`.
    pub fn with_resolver(resolver: &'r dyn AssetResolver) -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            created: None,
            slides: Vec::new(),
            media: Vec::new(),
            resolver,
            warnings: Vec::new(),
        }
    }

    /// Set the document title property.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Set the document author property.
    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = author.into();
    }

    /// Stamp creation and modification dates into the document properties.
    ///
    /// Left unset, the properties carry no dates and output is reproducible.
    pub fn set_created(&mut self, created: DateTime<Utc>) {
        self.created = Some(created);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created
    }

    /// Number of slides appended so far.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Content problems recovered from while rendering.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub(crate) fn warn(&mut self, message: String) {
        log::warn!("{}", message);
        self.warnings.push(message);
    }

    pub(crate) fn push_slide(&mut self, content: SlideContent) -> RenderedSlide {
        self.slides.push(content);
        RenderedSlide(self.slides.len() - 1)
    }

    pub(crate) fn slides(&self) -> &[SlideContent] {
        &self.slides
    }

    pub(crate) fn media(&self) -> &[Media] {
        &self.media
    }

    /// Resolve and embed an image, returning its media index and pixel size.
    ///
    /// On failure nothing is embedded and the reason is returned.
    pub(crate) fn embed_image(
        &mut self,
        image_ref: &str,
    ) -> std::result::Result<(usize, Option<(u32, u32)>), String> {
        let bytes = self.resolver.resolve(image_ref).map_err(|e| e.to_string())?;
        let format = ImageFormat::detect(&bytes)
            .ok_or_else(|| "not a PNG, JPEG or GIF image".to_string())?;

        let size = image_size(format, &bytes);
        self.media.push(Media { format, bytes });
        Ok((self.media.len() - 1, size))
    }

    /// XML of a rendered slide part.
    pub fn slide_xml(&self, slide: &RenderedSlide) -> Result<String> {
        let content = self.slides.get(slide.0).ok_or_else(|| {
            deck_core::RenderError::Xml(format!("slide {} does not belong to this document", slide.0))
        })?;
        write_slide_xml(content)
    }

    /// Serialize the finished document to PPTX bytes, consuming the builder.
    pub fn finish(self) -> Result<Vec<u8>> {
        log::debug!(
            "Packaging {} slides and {} media parts",
            self.slides.len(),
            self.media.len()
        );
        package::write_package(&self)
    }
}

/// Write the `<p:sld>` part for one slide.
pub(crate) fn write_slide_xml(content: &SlideContent) -> Result<String> {
    let mut w = XmlWriter::with_declaration()?;
    w.start("p:sld", &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)])?;
    w.start("p:cSld", &[("name", &content.name)])?;
    w.start("p:spTree", &[])?;
    write_group_header(&mut w)?;

    // Shape id 1 is the group itself.
    let mut picture_rel = 1;
    for (i, shape) in content.shapes.iter().enumerate() {
        let id = (i + 2).to_string();
        match shape {
            Shape::Text(text) => write_text_shape(&mut w, &id, text)?,
            Shape::Picture(pic) => {
                picture_rel += 1;
                write_picture(&mut w, &id, &format!("rId{}", picture_rel), pic)?;
            }
        }
    }

    w.end("p:spTree")?;
    w.end("p:cSld")?;
    w.start("p:clrMapOvr", &[])?;
    w.empty("a:masterClrMapping", &[])?;
    w.end("p:clrMapOvr")?;
    w.end("p:sld")?;
    w.into_string()
}

/// Write the `<p:notes>` part holding a slide's speaker notes.
pub(crate) fn write_notes_xml(notes: &str) -> Result<String> {
    let mut w = XmlWriter::with_declaration()?;
    w.start("p:notes", &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)])?;
    w.start("p:cSld", &[])?;
    w.start("p:spTree", &[])?;
    write_group_header(&mut w)?;

    w.start("p:sp", &[])?;
    w.start("p:nvSpPr", &[])?;
    w.empty("p:cNvPr", &[("id", "2"), ("name", "Slide Image Placeholder 1")])?;
    w.start("p:cNvSpPr", &[])?;
    w.empty("a:spLocks", &[("noGrp", "1"), ("noRot", "1"), ("noChangeAspect", "1")])?;
    w.end("p:cNvSpPr")?;
    w.start("p:nvPr", &[])?;
    w.empty("p:ph", &[("type", "sldImg")])?;
    w.end("p:nvPr")?;
    w.end("p:nvSpPr")?;
    w.empty("p:spPr", &[])?;
    w.end("p:sp")?;

    w.start("p:sp", &[])?;
    w.start("p:nvSpPr", &[])?;
    w.empty("p:cNvPr", &[("id", "3"), ("name", "Notes Placeholder 2")])?;
    w.start("p:cNvSpPr", &[])?;
    w.empty("a:spLocks", &[("noGrp", "1")])?;
    w.end("p:cNvSpPr")?;
    w.start("p:nvPr", &[])?;
    w.empty("p:ph", &[("type", "body"), ("idx", "1")])?;
    w.end("p:nvPr")?;
    w.end("p:nvSpPr")?;
    w.empty("p:spPr", &[])?;
    w.start("p:txBody", &[])?;
    w.empty("a:bodyPr", &[])?;
    w.empty("a:lstStyle", &[])?;
    for line in notes.lines() {
        w.start("a:p", &[])?;
        if !line.is_empty() {
            w.start("a:r", &[])?;
            w.empty("a:rPr", &[("lang", "en-US"), ("dirty", "0")])?;
            w.text_element("a:t", &[], line)?;
            w.end("a:r")?;
        }
        w.end("a:p")?;
    }
    w.end("p:txBody")?;
    w.end("p:sp")?;

    w.end("p:spTree")?;
    w.end("p:cSld")?;
    w.start("p:clrMapOvr", &[])?;
    w.empty("a:masterClrMapping", &[])?;
    w.end("p:clrMapOvr")?;
    w.end("p:notes")?;
    w.into_string()
}

/// The mandatory non-visual group properties at the top of every shape tree.
pub(crate) fn write_group_header(w: &mut XmlWriter) -> Result<()> {
    w.start("p:nvGrpSpPr", &[])?;
    w.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    w.empty("p:cNvGrpSpPr", &[])?;
    w.empty("p:nvPr", &[])?;
    w.end("p:nvGrpSpPr")?;
    w.start("p:grpSpPr", &[])?;
    w.start("a:xfrm", &[])?;
    w.empty("a:off", &[("x", "0"), ("y", "0")])?;
    w.empty("a:ext", &[("cx", "0"), ("cy", "0")])?;
    w.empty("a:chOff", &[("x", "0"), ("y", "0")])?;
    w.empty("a:chExt", &[("cx", "0"), ("cy", "0")])?;
    w.end("a:xfrm")?;
    w.end("p:grpSpPr")
}

/// `<p:ph>` for a slot, inside an open `<p:nvPr>`.
pub(crate) fn write_placeholder_ref(w: &mut XmlWriter, slot: Slot) -> Result<()> {
    match (slot.ph_type(), slot.ph_idx()) {
        (Some(ty), Some(idx)) => w.empty("p:ph", &[("type", ty), ("idx", idx)]),
        (Some(ty), None) => w.empty("p:ph", &[("type", ty)]),
        (None, Some(idx)) => w.empty("p:ph", &[("idx", idx)]),
        (None, None) => w.empty("p:ph", &[]),
    }
}

fn write_text_shape(w: &mut XmlWriter, id: &str, shape: &TextShape) -> Result<()> {
    w.start("p:sp", &[])?;
    w.start("p:nvSpPr", &[])?;
    w.empty("p:cNvPr", &[("id", id), ("name", &shape.name)])?;
    match shape.slot {
        Some(_) => {
            w.start("p:cNvSpPr", &[])?;
            w.empty("a:spLocks", &[("noGrp", "1")])?;
            w.end("p:cNvSpPr")?;
        }
        None => w.empty("p:cNvSpPr", &[("txBox", "1")])?,
    }
    match shape.slot {
        Some(slot) => {
            w.start("p:nvPr", &[])?;
            write_placeholder_ref(w, slot)?;
            w.end("p:nvPr")?;
        }
        None => w.empty("p:nvPr", &[])?,
    }
    w.end("p:nvSpPr")?;

    w.start("p:spPr", &[])?;
    w.xfrm(shape.frame.x, shape.frame.y, shape.frame.cx, shape.frame.cy)?;
    w.start("a:prstGeom", &[("prst", "rect")])?;
    w.empty("a:avLst", &[])?;
    w.end("a:prstGeom")?;
    match shape.fill {
        Some(fill) => w.solid_fill(fill)?,
        None => w.empty("a:noFill", &[])?,
    }
    w.end("p:spPr")?;

    w.start("p:txBody", &[])?;
    w.start(
        "a:bodyPr",
        &[("wrap", "square"), ("rtlCol", "0"), ("anchor", shape.anchor.as_attr())],
    )?;
    // Overflow is left to the viewer's shrink-on-overflow.
    w.empty("a:normAutofit", &[])?;
    w.end("a:bodyPr")?;
    w.empty("a:lstStyle", &[])?;
    if shape.paragraphs.is_empty() {
        w.empty("a:p", &[])?;
    }
    for paragraph in &shape.paragraphs {
        write_paragraph(w, paragraph)?;
    }
    w.end("p:txBody")?;
    w.end("p:sp")
}

fn write_paragraph(w: &mut XmlWriter, p: &Paragraph) -> Result<()> {
    let size = p.size.to_string();
    w.start("a:p", &[])?;

    if p.bullet {
        w.start(
            "a:pPr",
            &[("marL", "457200"), ("indent", "-457200"), ("algn", p.align.as_attr())],
        )?;
        w.start("a:spcBef", &[])?;
        w.empty("a:spcPts", &[("val", "1200")])?;
        w.end("a:spcBef")?;
        w.empty("a:buFont", &[("typeface", "Arial")])?;
        w.empty("a:buChar", &[("char", "\u{2022}")])?;
        w.end("a:pPr")?;
    } else {
        w.start("a:pPr", &[("marL", "0"), ("indent", "0"), ("algn", p.align.as_attr())])?;
        w.empty("a:buNone", &[])?;
        w.end("a:pPr")?;
    }

    for span in parse_spans(&p.text) {
        let (bold, color) = match span.emphasis {
            Emphasis::Plain => (p.bold, p.color),
            Emphasis::Bold => (true, p.color),
            Emphasis::Highlight => (true, color::ACCENT),
        };
        w.start("a:r", &[])?;
        let mut attrs = vec![("lang", "en-US"), ("sz", size.as_str())];
        if bold {
            attrs.push(("b", "1"));
        }
        attrs.push(("dirty", "0"));
        w.start("a:rPr", &attrs)?;
        w.solid_fill(color)?;
        w.end("a:rPr")?;
        w.text_element("a:t", &[], span.text)?;
        w.end("a:r")?;
    }

    w.empty("a:endParaRPr", &[("lang", "en-US"), ("sz", &size), ("dirty", "0")])?;
    w.end("a:p")
}

fn write_picture(w: &mut XmlWriter, id: &str, rel_id: &str, pic: &PictureShape) -> Result<()> {
    w.start("p:pic", &[])?;
    w.start("p:nvPicPr", &[])?;
    w.empty("p:cNvPr", &[("id", id), ("name", "Picture"), ("descr", &pic.description)])?;
    w.start("p:cNvPicPr", &[])?;
    w.empty("a:picLocks", &[("noChangeAspect", "1")])?;
    w.end("p:cNvPicPr")?;
    w.empty("p:nvPr", &[])?;
    w.end("p:nvPicPr")?;

    w.start("p:blipFill", &[])?;
    w.empty("a:blip", &[("r:embed", rel_id)])?;
    w.start("a:stretch", &[])?;
    w.empty("a:fillRect", &[])?;
    w.end("a:stretch")?;
    w.end("p:blipFill")?;

    w.start("p:spPr", &[])?;
    w.xfrm(pic.frame.x, pic.frame.y, pic.frame.cx, pic.frame.cy)?;
    w.start("a:prstGeom", &[("prst", "rect")])?;
    w.empty("a:avLst", &[])?;
    w.end("a:prstGeom")?;
    w.end("p:spPr")?;
    w.end("p:pic")
}
