//! Slide geometry, styling constants, and layout selection.
//!
//! All positions are in EMUs (914400 per inch). The deck is 16:9 at
//! 16 x 9 inches.

use deck_core::SlideKind;

/// EMUs per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// Convert hundredths of an inch to EMUs.
pub const fn hundredths(h: i64) -> i64 {
    h * EMU_PER_INCH / 100
}

pub const SLIDE_WIDTH: i64 = 16 * EMU_PER_INCH;
pub const SLIDE_HEIGHT: i64 = 9 * EMU_PER_INCH;

pub const MARGIN_LEFT: i64 = EMU_PER_INCH;
pub const MARGIN_RIGHT: i64 = EMU_PER_INCH;
pub const MARGIN_TOP: i64 = hundredths(80);
pub const MARGIN_BOTTOM: i64 = hundredths(80);

/// Gap between the two columns of a split layout.
pub const COLUMN_GAP: i64 = hundredths(50);

/// Width available between the side margins.
pub const CONTENT_WIDTH: i64 = SLIDE_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;

/// Top of the body area under a slide heading.
pub const BODY_TOP: i64 = MARGIN_TOP + hundredths(120);

/// Height of the body area under a slide heading.
pub const BODY_HEIGHT: i64 = SLIDE_HEIGHT - BODY_TOP - MARGIN_BOTTOM;

/// Colors, as `RRGGBB`.
pub mod color {
    pub const TEXT: &str = "202124";
    pub const ACCENT: &str = "4285F4";
    pub const MUTED: &str = "5F6368";
    pub const PLACEHOLDER_FILL: &str = "DADCE0";
}

/// Font sizes in hundredths of a point.
pub mod size {
    pub const DECK_TITLE: u32 = 6000;
    pub const SUBTITLE: u32 = 2400;
    pub const SECTION_TITLE: u32 = 5400;
    pub const SECTION_NUMBER: u32 = 15000;
    pub const SLIDE_TITLE: u32 = 3600;
    pub const BODY: u32 = 2400;
    pub const CAPTION: u32 = 2000;
}

/// A rectangle on the slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Frame {
    pub const fn new(x: i64, y: i64, cx: i64, cy: i64) -> Self {
        Self { x, y, cx, cy }
    }

    /// Largest frame with the given aspect ratio that fits inside this one,
    /// centered.
    pub fn fit(&self, width: u32, height: u32) -> Frame {
        if width == 0 || height == 0 || self.cx <= 0 || self.cy <= 0 {
            return *self;
        }
        let (w, h) = (i128::from(width), i128::from(height));
        let (cx, cy) = (i128::from(self.cx), i128::from(self.cy));

        // Compare w/h against cx/cy without floating point.
        let (fit_cx, fit_cy) = if w * cy >= h * cx {
            (cx, cx * h / w)
        } else {
            (cy * w / h, cy)
        };
        let fit_cx = fit_cx as i64;
        let fit_cy = fit_cy as i64;

        Frame {
            x: self.x + (self.cx - fit_cx) / 2,
            y: self.y + (self.cy - fit_cy) / 2,
            cx: fit_cx,
            cy: fit_cy,
        }
    }
}

/// The slide layouts shipped in the package, in part order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Centered deck title with a subtitle line.
    Title,
    /// Heading over a bulleted body.
    TitleAndBody,
    /// Section divider: number beside a large heading.
    SectionDivider,
    /// Picture on the left, heading and caption on the right.
    Split,
}

impl Layout {
    /// All layouts, in the order they are numbered in the package.
    pub const ALL: [Layout; 4] = [
        Layout::Title,
        Layout::TitleAndBody,
        Layout::SectionDivider,
        Layout::Split,
    ];

    /// Pick the layout for a slide kind. Pure and total.
    pub fn for_kind(kind: SlideKind) -> Self {
        match kind {
            SlideKind::Title => Layout::Title,
            SlideKind::Bullets => Layout::TitleAndBody,
            SlideKind::SectionHeader => Layout::SectionDivider,
            SlideKind::ImageText => Layout::Split,
        }
    }

    /// 1-based number of the `slideLayoutN.xml` part.
    pub fn part_number(self) -> usize {
        match self {
            Layout::Title => 1,
            Layout::TitleAndBody => 2,
            Layout::SectionDivider => 3,
            Layout::Split => 4,
        }
    }

    /// Layout name shown in PowerPoint's layout picker.
    pub fn display_name(self) -> &'static str {
        match self {
            Layout::Title => "Title Slide",
            Layout::TitleAndBody => "Title and Content",
            Layout::SectionDivider => "Section Header",
            Layout::Split => "Picture with Caption",
        }
    }

    /// The `type` attribute of the `<p:sldLayout>` element.
    pub fn ooxml_type(self) -> &'static str {
        match self {
            Layout::Title => "title",
            Layout::TitleAndBody => "obj",
            Layout::SectionDivider => "secHead",
            Layout::Split => "picTx",
        }
    }
}

/// A placeholder position shared by a layout and the slides that use it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    CenterTitle,
    Subtitle,
    Title,
    Body,
    Picture,
    Caption,
}

impl Slot {
    /// The `type` attribute of `<p:ph>`, if not the default object type.
    pub fn ph_type(self) -> Option<&'static str> {
        match self {
            Slot::CenterTitle => Some("ctrTitle"),
            Slot::Subtitle => Some("subTitle"),
            Slot::Title => Some("title"),
            Slot::Body => None,
            Slot::Picture => Some("pic"),
            Slot::Caption => Some("body"),
        }
    }

    /// The `idx` attribute of `<p:ph>`; titles carry none.
    pub fn ph_idx(self) -> Option<&'static str> {
        match self {
            Slot::CenterTitle | Slot::Title => None,
            Slot::Subtitle | Slot::Body | Slot::Picture => Some("1"),
            Slot::Caption => Some("2"),
        }
    }

    /// Shape name used in layouts and slides.
    pub fn name(self) -> &'static str {
        match self {
            Slot::CenterTitle | Slot::Title => "Title",
            Slot::Subtitle => "Subtitle",
            Slot::Body => "Content",
            Slot::Picture => "Picture",
            Slot::Caption => "Caption",
        }
    }
}

impl Layout {
    /// Placeholders declared by this layout, with their frames.
    pub fn slots(self) -> &'static [(Slot, Frame)] {
        match self {
            Layout::Title => &[
                (Slot::CenterTitle, frames::DECK_TITLE),
                (Slot::Subtitle, frames::DECK_SUBTITLE),
            ],
            Layout::TitleAndBody => &[
                (Slot::Title, frames::SLIDE_TITLE),
                (Slot::Body, frames::BODY),
            ],
            Layout::SectionDivider => &[(Slot::Title, frames::SECTION_TITLE)],
            Layout::Split => &[
                (Slot::Title, frames::SLIDE_TITLE),
                (Slot::Picture, frames::SPLIT_PICTURE),
                (Slot::Caption, frames::SPLIT_CAPTION),
            ],
        }
    }
}

/// Frames used by each layout.
pub mod frames {
    use super::*;

    pub const DECK_TITLE: Frame =
        Frame::new(EMU_PER_INCH, hundredths(300), SLIDE_WIDTH - 2 * EMU_PER_INCH, hundredths(250));
    pub const DECK_SUBTITLE: Frame =
        Frame::new(EMU_PER_INCH, hundredths(570), SLIDE_WIDTH - 2 * EMU_PER_INCH, EMU_PER_INCH);

    pub const SECTION_NUMBER: Frame = Frame::new(MARGIN_LEFT, 3 * EMU_PER_INCH, 2 * EMU_PER_INCH, 3 * EMU_PER_INCH);
    pub const SECTION_TITLE_NUMBERED: Frame = Frame::new(
        MARGIN_LEFT + 2 * EMU_PER_INCH + COLUMN_GAP,
        3 * EMU_PER_INCH,
        CONTENT_WIDTH - 2 * EMU_PER_INCH - COLUMN_GAP,
        3 * EMU_PER_INCH,
    );
    pub const SECTION_TITLE: Frame =
        Frame::new(MARGIN_LEFT, 3 * EMU_PER_INCH, CONTENT_WIDTH, 3 * EMU_PER_INCH);
    pub const SECTION_SUBTITLE: Frame =
        Frame::new(MARGIN_LEFT, hundredths(610), CONTENT_WIDTH, EMU_PER_INCH);

    pub const SLIDE_TITLE: Frame = Frame::new(MARGIN_LEFT, MARGIN_TOP, CONTENT_WIDTH, EMU_PER_INCH);
    pub const BODY: Frame = Frame::new(MARGIN_LEFT, BODY_TOP, CONTENT_WIDTH, BODY_HEIGHT);

    pub const COLUMN_WIDTH: i64 = (CONTENT_WIDTH - COLUMN_GAP) / 2;
    pub const SPLIT_PICTURE: Frame = Frame::new(MARGIN_LEFT, BODY_TOP, COLUMN_WIDTH, BODY_HEIGHT);
    pub const SPLIT_CAPTION: Frame = Frame::new(
        MARGIN_LEFT + COLUMN_WIDTH + COLUMN_GAP,
        BODY_TOP,
        COLUMN_WIDTH,
        BODY_HEIGHT,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_for_kind() {
        assert_eq!(Layout::for_kind(SlideKind::Title), Layout::Title);
        assert_eq!(Layout::for_kind(SlideKind::Bullets), Layout::TitleAndBody);
        assert_eq!(Layout::for_kind(SlideKind::SectionHeader), Layout::SectionDivider);
        assert_eq!(Layout::for_kind(SlideKind::ImageText), Layout::Split);
    }

    #[test]
    fn test_part_numbers_follow_all() {
        for (idx, layout) in Layout::ALL.iter().enumerate() {
            assert_eq!(layout.part_number(), idx + 1);
        }
    }

    #[test]
    fn test_frames_inside_slide() {
        for frame in [
            frames::DECK_TITLE,
            frames::DECK_SUBTITLE,
            frames::SECTION_NUMBER,
            frames::SECTION_TITLE_NUMBERED,
            frames::SECTION_SUBTITLE,
            frames::SLIDE_TITLE,
            frames::BODY,
            frames::SPLIT_PICTURE,
            frames::SPLIT_CAPTION,
        ] {
            assert!(frame.x >= 0 && frame.y >= 0);
            assert!(frame.x + frame.cx <= SLIDE_WIDTH, "{:?}", frame);
            assert!(frame.y + frame.cy <= SLIDE_HEIGHT, "{:?}", frame);
        }
    }

    #[test]
    fn test_fit_wide_image() {
        let frame = Frame::new(0, 0, 1000, 1000);
        assert_eq!(frame.fit(200, 100), Frame::new(0, 250, 1000, 500));
    }

    #[test]
    fn test_fit_tall_image() {
        let frame = Frame::new(100, 0, 1000, 500);
        assert_eq!(frame.fit(100, 100), Frame::new(350, 0, 500, 500));
    }

    #[test]
    fn test_fit_unknown_size_keeps_frame() {
        let frame = Frame::new(1, 2, 3, 4);
        assert_eq!(frame.fit(0, 10), frame);
    }
}
