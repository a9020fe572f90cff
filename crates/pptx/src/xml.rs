//! Thin wrapper over `quick_xml::Writer` for emitting OOXML parts.

use crate::Result;
use deck_core::normalize::xml_safe;
use deck_core::RenderError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// DrawingML namespace.
pub(crate) const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
/// PresentationML namespace.
pub(crate) const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
/// Office relationships namespace (for `r:id`, `r:embed`).
pub(crate) const NS_R: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Streaming XML writer. Text and attribute values are escaped on write, and
/// characters XML 1.0 cannot carry are removed.
pub(crate) struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    /// Start a new part with the standard `standalone="yes"` declaration.
    pub(crate) fn with_declaration() -> Result<Self> {
        let mut writer = Self {
            inner: Writer::new(Vec::with_capacity(4096)),
        };
        writer.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(writer)
    }

    pub(crate) fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let elem = element(name, attrs);
        self.emit(Event::Start(elem))
    }

    pub(crate) fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let elem = element(name, attrs);
        self.emit(Event::Empty(elem))
    }

    pub(crate) fn end(&mut self, name: &str) -> Result<()> {
        self.emit(Event::End(BytesEnd::new(name)))
    }

    pub(crate) fn text(&mut self, text: &str) -> Result<()> {
        let text = xml_safe(text);
        self.emit(Event::Text(BytesText::new(&text)))
    }

    /// `<name attrs>text</name>`
    pub(crate) fn text_element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(name, attrs)?;
        self.text(text)?;
        self.end(name)
    }

    /// `<a:xfrm><a:off/><a:ext/></a:xfrm>` for a frame in EMUs.
    pub(crate) fn xfrm(&mut self, x: i64, y: i64, cx: i64, cy: i64) -> Result<()> {
        let (x, y, cx, cy) = (x.to_string(), y.to_string(), cx.to_string(), cy.to_string());
        self.start("a:xfrm", &[])?;
        self.empty("a:off", &[("x", &x), ("y", &y)])?;
        self.empty("a:ext", &[("cx", &cx), ("cy", &cy)])?;
        self.end("a:xfrm")
    }

    /// `<a:solidFill><a:srgbClr val=".."/></a:solidFill>`
    pub(crate) fn solid_fill(&mut self, rgb: &str) -> Result<()> {
        self.start("a:solidFill", &[])?;
        self.empty("a:srgbClr", &[("val", rgb)])?;
        self.end("a:solidFill")
    }

    /// Append pre-built markup verbatim (static template fragments).
    pub(crate) fn raw(&mut self, markup: &str) -> Result<()> {
        use std::io::Write;
        self.inner.get_mut().write_all(markup.as_bytes())?;
        Ok(())
    }

    pub(crate) fn into_string(self) -> Result<String> {
        String::from_utf8(self.inner.into_inner())
            .map_err(|e| RenderError::Xml(format!("non UTF-8 output: {}", e)))
    }

    fn emit(&mut self, event: Event<'_>) -> Result<()> {
        self.inner
            .write_event(event)
            .map_err(|e| RenderError::Xml(e.to_string()))
    }
}

fn element<'a>(name: &'a str, attrs: &[(&str, &str)]) -> BytesStart<'a> {
    let mut elem = BytesStart::new(name);
    for &(key, value) in attrs {
        elem.push_attribute((key, xml_safe(value).as_ref()));
    }
    elem
}
