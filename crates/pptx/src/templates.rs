//! Fixed parts of the package: theme, slide master, layouts, notes master
//! and the presentation-level property parts.
//!
//! Layouts are generated from [`Layout::slots`] so slides and layouts always
//! agree on placeholder positions.

use crate::document::{write_group_header, write_placeholder_ref};
use crate::layout::{color, frames, Frame, Layout, Slot, SLIDE_HEIGHT, SLIDE_WIDTH};
use crate::xml::{XmlWriter, NS_A, NS_P, NS_R};
use crate::Result;

/// First id in `sldLayoutIdLst`; must exceed the master id 2147483648.
const FIRST_LAYOUT_ID: u64 = 2_147_483_649;

/// Relationship id of the theme from the slide master, after the layouts.
pub(crate) fn master_theme_rel_id() -> String {
    format!("rId{}", Layout::ALL.len() + 1)
}

/// The deck's theme. `name` distinguishes the slide theme from the notes theme.
pub(crate) fn theme_xml(name: &str) -> Result<String> {
    let mut w = XmlWriter::with_declaration()?;
    w.start("a:theme", &[("xmlns:a", NS_A), ("name", name)])?;
    w.start("a:themeElements", &[])?;

    w.start("a:clrScheme", &[("name", "Deck")])?;
    let scheme = [
        ("a:dk1", color::TEXT),
        ("a:lt1", "FFFFFF"),
        ("a:dk2", color::MUTED),
        ("a:lt2", "F1F3F4"),
        ("a:accent1", color::ACCENT),
        ("a:accent2", "EA4335"),
        ("a:accent3", "FBBC04"),
        ("a:accent4", "34A853"),
        ("a:accent5", "FA7B17"),
        ("a:accent6", "A142F4"),
        ("a:hlink", "1A73E8"),
        ("a:folHlink", "681DA8"),
    ];
    for (slot, rgb) in scheme {
        w.start(slot, &[])?;
        w.empty("a:srgbClr", &[("val", rgb)])?;
        w.end(slot)?;
    }
    w.end("a:clrScheme")?;

    w.start("a:fontScheme", &[("name", "Deck")])?;
    for font in ["a:majorFont", "a:minorFont"] {
        w.start(font, &[])?;
        w.empty("a:latin", &[("typeface", "Arial")])?;
        w.empty("a:ea", &[("typeface", "")])?;
        w.empty("a:cs", &[("typeface", "")])?;
        w.end(font)?;
    }
    w.end("a:fontScheme")?;

    w.raw(FORMAT_SCHEME)?;
    w.end("a:themeElements")?;
    w.empty("a:objectDefaults", &[])?;
    w.empty("a:extraClrSchemeLst", &[])?;
    w.end("a:theme")?;
    w.into_string()
}

/// Minimal format scheme; every list needs at least three entries.
const FORMAT_SCHEME: &str = concat!(
    r#"<a:fmtScheme name="Deck"><a:fillStyleLst>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"><a:tint val="50000"/></a:schemeClr></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"><a:shade val="80000"/></a:schemeClr></a:solidFill>"#,
    r#"</a:fillStyleLst><a:lnStyleLst>"#,
    r#"<a:ln w="9525"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
    r#"<a:ln w="25400"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
    r#"<a:ln w="38100"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
    r#"</a:lnStyleLst><a:effectStyleLst>"#,
    r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#,
    r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#,
    r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#,
    r#"</a:effectStyleLst><a:bgFillStyleLst>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"><a:tint val="95000"/></a:schemeClr></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"><a:shade val="90000"/></a:schemeClr></a:solidFill>"#,
    r#"</a:bgFillStyleLst></a:fmtScheme>"#,
);

/// Standard color map shared by the masters.
fn write_color_map(w: &mut XmlWriter) -> Result<()> {
    w.empty(
        "p:clrMap",
        &[
            ("bg1", "lt1"),
            ("tx1", "dk1"),
            ("bg2", "lt2"),
            ("tx2", "dk2"),
            ("accent1", "accent1"),
            ("accent2", "accent2"),
            ("accent3", "accent3"),
            ("accent4", "accent4"),
            ("accent5", "accent5"),
            ("accent6", "accent6"),
            ("hlink", "hlink"),
            ("folHlink", "folHlink"),
        ],
    )
}

/// An empty placeholder shape as declared by a master or layout.
fn write_placeholder(w: &mut XmlWriter, id: usize, slot: Slot, frame: Frame) -> Result<()> {
    let id = id.to_string();
    w.start("p:sp", &[])?;
    w.start("p:nvSpPr", &[])?;
    w.empty("p:cNvPr", &[("id", &id), ("name", slot.name())])?;
    w.start("p:cNvSpPr", &[])?;
    w.empty("a:spLocks", &[("noGrp", "1")])?;
    w.end("p:cNvSpPr")?;
    w.start("p:nvPr", &[])?;
    write_placeholder_ref(w, slot)?;
    w.end("p:nvPr")?;
    w.end("p:nvSpPr")?;
    w.start("p:spPr", &[])?;
    w.xfrm(frame.x, frame.y, frame.cx, frame.cy)?;
    w.end("p:spPr")?;
    w.start("p:txBody", &[])?;
    w.empty("a:bodyPr", &[])?;
    w.empty("a:lstStyle", &[])?;
    w.start("a:p", &[])?;
    w.empty("a:endParaRPr", &[("lang", "en-US")])?;
    w.end("a:p")?;
    w.end("p:txBody")?;
    w.end("p:sp")
}

fn write_white_background(w: &mut XmlWriter) -> Result<()> {
    w.start("p:bg", &[])?;
    w.start("p:bgPr", &[])?;
    w.solid_fill("FFFFFF")?;
    w.empty("a:effectLst", &[])?;
    w.end("p:bgPr")?;
    w.end("p:bg")
}

/// `ppt/slideMasters/slideMaster1.xml`. Layouts are `rId1..`, theme follows.
pub(crate) fn slide_master_xml() -> Result<String> {
    let mut w = XmlWriter::with_declaration()?;
    w.start("p:sldMaster", &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)])?;
    w.start("p:cSld", &[])?;
    write_white_background(&mut w)?;
    w.start("p:spTree", &[])?;
    write_group_header(&mut w)?;
    write_placeholder(&mut w, 2, Slot::Title, frames::SLIDE_TITLE)?;
    write_placeholder(&mut w, 3, Slot::Body, frames::BODY)?;
    w.end("p:spTree")?;
    w.end("p:cSld")?;
    write_color_map(&mut w)?;

    w.start("p:sldLayoutIdLst", &[])?;
    for (i, _) in Layout::ALL.iter().enumerate() {
        let id = (FIRST_LAYOUT_ID + i as u64).to_string();
        let rel = format!("rId{}", i + 1);
        w.empty("p:sldLayoutId", &[("id", &id), ("r:id", &rel)])?;
    }
    w.end("p:sldLayoutIdLst")?;

    w.raw(TEXT_STYLES)?;
    w.end("p:sldMaster")?;
    w.into_string()
}

/// Master text styles: title, body (bulleted) and other.
const TEXT_STYLES: &str = concat!(
    "<p:txStyles>",
    r#"<p:titleStyle><a:lvl1pPr algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1">"#,
    r#"<a:lnSpc><a:spcPct val="90000"/></a:lnSpc><a:spcBef><a:spcPct val="0"/></a:spcBef><a:buNone/>"#,
    r#"<a:defRPr sz="3600" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill>"#,
    r#"<a:latin typeface="+mj-lt"/><a:ea typeface="+mj-ea"/><a:cs typeface="+mj-cs"/></a:defRPr></a:lvl1pPr></p:titleStyle>"#,
    r#"<p:bodyStyle><a:lvl1pPr marL="228600" indent="-228600" algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1">"#,
    r#"<a:lnSpc><a:spcPct val="90000"/></a:lnSpc><a:spcBef><a:spcPts val="1000"/></a:spcBef>"#,
    r#"<a:buFont typeface="Arial"/><a:buChar char="&#8226;"/>"#,
    r#"<a:defRPr sz="2400" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill>"#,
    r#"<a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr></a:lvl1pPr></p:bodyStyle>"#,
    r#"<p:otherStyle><a:defPPr><a:defRPr lang="en-US"/></a:defPPr>"#,
    r#"<a:lvl1pPr marL="0" algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1">"#,
    r#"<a:defRPr sz="1800" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill>"#,
    r#"<a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr></a:lvl1pPr></p:otherStyle>"#,
    "</p:txStyles>",
);

/// `ppt/slideLayouts/slideLayoutN.xml` for one layout.
pub(crate) fn slide_layout_xml(layout: Layout) -> Result<String> {
    let mut w = XmlWriter::with_declaration()?;
    w.start(
        "p:sldLayout",
        &[
            ("xmlns:a", NS_A),
            ("xmlns:r", NS_R),
            ("xmlns:p", NS_P),
            ("type", layout.ooxml_type()),
            ("preserve", "1"),
        ],
    )?;
    w.start("p:cSld", &[("name", layout.display_name())])?;
    w.start("p:spTree", &[])?;
    write_group_header(&mut w)?;
    for (i, (slot, frame)) in layout.slots().iter().enumerate() {
        write_placeholder(&mut w, i + 2, *slot, *frame)?;
    }
    w.end("p:spTree")?;
    w.end("p:cSld")?;
    w.start("p:clrMapOvr", &[])?;
    w.empty("a:masterClrMapping", &[])?;
    w.end("p:clrMapOvr")?;
    w.end("p:sldLayout")?;
    w.into_string()
}

/// Notes page size: portrait letter.
pub(crate) const NOTES_WIDTH: i64 = 6_858_000;
pub(crate) const NOTES_HEIGHT: i64 = 9_144_000;

/// `ppt/notesMasters/notesMaster1.xml`. Its theme is `rId1`.
pub(crate) fn notes_master_xml() -> Result<String> {
    let mut w = XmlWriter::with_declaration()?;
    w.start("p:notesMaster", &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)])?;
    w.start("p:cSld", &[])?;
    write_white_background(&mut w)?;
    w.start("p:spTree", &[])?;
    write_group_header(&mut w)?;

    // Slide thumbnail on the upper half, notes body below.
    let thumb_cx = NOTES_WIDTH * 8 / 10;
    let thumb_cy = thumb_cx * SLIDE_HEIGHT / SLIDE_WIDTH;
    let thumb = Frame::new((NOTES_WIDTH - thumb_cx) / 2, NOTES_HEIGHT / 12, thumb_cx, thumb_cy);
    let body_y = thumb.y + thumb.cy + NOTES_HEIGHT / 24;
    let body = Frame::new(thumb.x, body_y, thumb_cx, NOTES_HEIGHT - body_y - NOTES_HEIGHT / 12);

    w.start("p:sp", &[])?;
    w.start("p:nvSpPr", &[])?;
    w.empty("p:cNvPr", &[("id", "2"), ("name", "Slide Image Placeholder")])?;
    w.start("p:cNvSpPr", &[])?;
    w.empty("a:spLocks", &[("noGrp", "1"), ("noRot", "1"), ("noChangeAspect", "1")])?;
    w.end("p:cNvSpPr")?;
    w.start("p:nvPr", &[])?;
    w.empty("p:ph", &[("type", "sldImg"), ("idx", "2")])?;
    w.end("p:nvPr")?;
    w.end("p:nvSpPr")?;
    w.start("p:spPr", &[])?;
    w.xfrm(thumb.x, thumb.y, thumb.cx, thumb.cy)?;
    w.end("p:spPr")?;
    w.end("p:sp")?;

    w.start("p:sp", &[])?;
    w.start("p:nvSpPr", &[])?;
    w.empty("p:cNvPr", &[("id", "3"), ("name", "Notes Placeholder")])?;
    w.start("p:cNvSpPr", &[])?;
    w.empty("a:spLocks", &[("noGrp", "1")])?;
    w.end("p:cNvSpPr")?;
    w.start("p:nvPr", &[])?;
    w.empty("p:ph", &[("type", "body"), ("idx", "1")])?;
    w.end("p:nvPr")?;
    w.end("p:nvSpPr")?;
    w.start("p:spPr", &[])?;
    w.xfrm(body.x, body.y, body.cx, body.cy)?;
    w.end("p:spPr")?;
    w.start("p:txBody", &[])?;
    w.empty("a:bodyPr", &[])?;
    w.empty("a:lstStyle", &[])?;
    w.empty("a:p", &[])?;
    w.end("p:txBody")?;
    w.end("p:sp")?;

    w.end("p:spTree")?;
    w.end("p:cSld")?;
    write_color_map(&mut w)?;
    w.end("p:notesMaster")?;
    w.into_string()
}

pub(crate) const PRES_PROPS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<p:presentationPr xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"/>"#,
);

pub(crate) const VIEW_PROPS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<p:viewPr xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#,
    r#"<p:normalViewPr><p:restoredLeft sz="15620"/><p:restoredTop sz="94660"/></p:normalViewPr>"#,
    r#"<p:gridSpacing cx="76200" cy="76200"/></p:viewPr>"#,
);

pub(crate) const TABLE_STYLES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<a:tblStyleLst xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"def="{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}"/>"#,
);
