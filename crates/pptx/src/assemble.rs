//! Document assembler: renders a whole outline into one PPTX.

use crate::assets::{AssetResolver, NoAssets};
use crate::document::DocumentBuilder;
use crate::render::render;
use crate::Result;
use chrono::{DateTime, Utc};
use deck_core::Outline;

/// A serialized deck plus anything the renderer had to work around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    pub bytes: Vec<u8>,
    pub warnings: Vec<String>,
}

/// Renders outlines into PPTX documents.
///
/// Holds no per-document state, so one assembler can serve any number of
/// outlines, from several threads if the resolver allows it.
pub struct Assembler {
    resolver: Box<dyn AssetResolver + Send + Sync>,
    created: Option<DateTime<Utc>>,
}

impl Assembler {
    /// Assembler without an image store; image slides get placeholders.
    pub fn new() -> Self {
        Self {
            resolver: Box::new(NoAssets),
            created: None,
        }
    }

    /// Resolve `image_ref`s through `resolver`.
    pub fn with_resolver(mut self, resolver: impl AssetResolver + Send + Sync + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Stamp this creation time into the document properties.
    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }

    /// Render every slide in order and serialize the result.
    ///
    /// Only serialization failures are errors; content problems end up in
    /// [`Assembly::warnings`].
    pub fn assemble(&self, outline: &Outline) -> Result<Assembly> {
        let mut document = DocumentBuilder::with_resolver(self.resolver.as_ref());
        document.set_title(outline.title());
        document.set_author(outline.author());
        if let Some(created) = self.created {
            document.set_created(created);
        }

        for slide in outline.slides() {
            render(slide, &mut document);
        }

        let warnings = document.warnings().to_vec();
        let slide_count = document.slide_count();
        let bytes = document.finish()?;
        log::info!(
            "Assembled '{}': {} slides, {} bytes, {} warnings",
            outline.title(),
            slide_count,
            bytes.len(),
            warnings.len()
        );

        Ok(Assembly { bytes, warnings })
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Render `outline` with default settings: no image store, no timestamps.
pub fn assemble(outline: &Outline) -> Result<Vec<u8>> {
    Assembler::new().assemble(outline).map(|assembly| assembly.bytes)
}
