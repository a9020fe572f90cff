//! Domain types for representing a validated presentation outline.

use crate::error::SchemaError;
use serde::Serialize;

/// Title used when the model output carries none.
pub const DEFAULT_TITLE: &str = "Untitled Presentation";

/// Author used when the model output carries none.
pub const DEFAULT_AUTHOR: &str = "Unknown Author";

/// A validated presentation outline.
///
/// Only constructible through [`Outline::new`] or the validator, both of which
/// enforce the invariants: a non-blank title and at least one slide, each of
/// which satisfies [`SlideSpec::check`]. There are no mutators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outline {
    title: String,
    author: String,
    slides: Vec<SlideSpec>,
}

impl Outline {
    /// Build an outline, rejecting anything that breaks the invariants.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        slides: Vec<SlideSpec>,
    ) -> Result<Self, SchemaError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(SchemaError::MalformedStructure(
                "outline title is blank".to_string(),
            ));
        }
        if slides.is_empty() {
            return Err(SchemaError::EmptyDeck);
        }
        for (idx, slide) in slides.iter().enumerate() {
            if let Err(reason) = slide.check() {
                return Err(SchemaError::MalformedStructure(format!(
                    "slide {}: {}",
                    idx + 1,
                    reason
                )));
            }
        }

        Ok(Self {
            title,
            author: author.into(),
            slides,
        })
    }

    /// Deck title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Deck author, written to the document properties.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Slides in presentation order.
    pub fn slides(&self) -> &[SlideSpec] {
        &self.slides
    }
}

/// The layout family a slide asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideKind {
    /// Deck cover: big centered heading, optional subtitle.
    Title,
    /// Heading plus a flat list of bullet lines.
    Bullets,
    /// Picture beside a heading and caption.
    ImageText,
    /// Section divider.
    SectionHeader,
}

impl SlideKind {
    /// Match a model-provided kind name.
    ///
    /// Case, dashes, underscores and spaces are ignored, and the type names
    /// of the older outline schema are accepted as aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "title" | "titleslide" | "cover" => Some(Self::Title),
            "bullets" | "bullet" | "content" | "list" | "bulletlist" => Some(Self::Bullets),
            "imagetext" | "image" | "picture" | "imagewithtext" => Some(Self::ImageText),
            "sectionheader" | "section" | "sectiontitle" | "divider" => {
                Some(Self::SectionHeader)
            }
            _ => None,
        }
    }

    /// Short lowercase name, used in slide names and log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Bullets => "bullets",
            Self::ImageText => "image_text",
            Self::SectionHeader => "section_header",
        }
    }
}

/// One slide's content and intended layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlideSpec {
    /// Layout family.
    pub kind: SlideKind,

    /// Slide heading. Never blank.
    pub heading: String,

    /// Bullet lines; empty for title and section slides.
    pub body: Vec<String>,

    /// Image handle; only used by image slides.
    pub image_ref: Option<String>,

    /// Secondary line under a title slide heading (date, byline).
    pub subtitle: Option<String>,

    /// Section number shown on section dividers.
    pub section_no: Option<u32>,

    /// Speaker notes.
    pub notes: Option<String>,
}

impl SlideSpec {
    fn empty(kind: SlideKind, heading: impl Into<String>) -> Self {
        Self {
            kind,
            heading: heading.into(),
            body: Vec::new(),
            image_ref: None,
            subtitle: None,
            section_no: None,
            notes: None,
        }
    }

    /// A title slide.
    pub fn title(heading: impl Into<String>) -> Self {
        Self::empty(SlideKind::Title, heading)
    }

    /// A section divider.
    pub fn section(heading: impl Into<String>) -> Self {
        Self::empty(SlideKind::SectionHeader, heading)
    }

    /// A bullet slide.
    pub fn bullets<I, S>(heading: impl Into<String>, body: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut slide = Self::empty(SlideKind::Bullets, heading);
        slide.body = body.into_iter().map(Into::into).collect();
        slide
    }

    /// An image slide with a caption line.
    pub fn image_text(
        heading: impl Into<String>,
        caption: impl Into<String>,
        image_ref: impl Into<String>,
    ) -> Self {
        let mut slide = Self::empty(SlideKind::ImageText, heading);
        slide.body = vec![caption.into()];
        slide.image_ref = Some(image_ref.into());
        slide
    }

    /// Set the subtitle line.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Set the section number.
    pub fn with_section_no(mut self, section_no: u32) -> Self {
        self.section_no = Some(section_no);
        self
    }

    /// Set speaker notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// The caption of an image slide: its first body line, if any.
    pub fn caption(&self) -> Option<&str> {
        self.body.first().map(String::as_str)
    }

    /// Check the per-kind invariants, returning the reason on failure.
    pub fn check(&self) -> std::result::Result<(), &'static str> {
        if self.heading.trim().is_empty() {
            return Err("heading is empty");
        }

        match self.kind {
            SlideKind::Bullets if self.body.is_empty() => Err("bullet slide has no body lines"),
            SlideKind::ImageText
                if self
                    .image_ref
                    .as_deref()
                    .map_or(true, |r| r.trim().is_empty()) =>
            {
                Err("image slide has no image reference")
            }
            SlideKind::Title | SlideKind::SectionHeader if !self.body.is_empty() => {
                Err("title and section slides take no body lines")
            }
            _ => Ok(()),
        }
    }
}

/// The validator's result: an outline plus what had to be repaired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated {
    /// The validated outline.
    pub outline: Outline,

    /// One line per repair or dropped slide, in the order they happened.
    pub warnings: Vec<String>,
}
