//! End-to-end request: topic → model output → outline → PPTX → storage.

use crate::assemble::Assembler;
use deck_core::{
    suggested_filename, OutlineParser, OutlineSource, PublishError, Publisher, RenderError,
    SchemaError, SourceError,
};
use thiserror::Error;

/// Why a request failed. Each stage maps to one variant.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("model call failed: {0}")]
    Source(#[from] SourceError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Render(#[from] RenderError),

    /// The deck was rendered but could not be stored. The bytes are kept so
    /// the caller can retry or hand them over another way.
    #[error("deck rendered but not published: {error}")]
    Publish {
        #[source]
        error: PublishError,
        document: Vec<u8>,
        filename: String,
    },
}

/// A stored deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    /// Where the publisher put the document.
    pub location: String,
    /// Name the publisher stored it under.
    pub filename: String,
    pub slide_count: usize,
    /// Validator repairs followed by renderer fallbacks.
    pub warnings: Vec<String>,
}

/// Wires a model source and a publisher around the parser and assembler.
///
/// Holds no mutable state; `run` may be called repeatedly.
pub struct Pipeline<S, P> {
    source: S,
    publisher: P,
    parser: OutlineParser,
    assembler: Assembler,
}

impl<S: OutlineSource, P: Publisher> Pipeline<S, P> {
    pub fn new(source: S, publisher: P) -> Self {
        Self {
            source,
            publisher,
            parser: OutlineParser::new(),
            assembler: Assembler::new(),
        }
    }

    /// Use a configured assembler (image store, timestamps).
    pub fn with_assembler(mut self, assembler: Assembler) -> Self {
        self.assembler = assembler;
        self
    }

    /// Use a configured parser.
    pub fn with_parser(mut self, parser: OutlineParser) -> Self {
        self.parser = parser;
        self
    }

    /// Generate, validate, render and publish a deck for `topic`.
    pub fn run(&self, topic: &str) -> Result<Published, PipelineError> {
        log::info!("Generating deck for topic '{}'", topic);
        let raw = self.source.generate(topic)?;

        let validated = self.parser.parse(&raw)?;
        let outline = validated.outline;
        let mut warnings = validated.warnings;

        let assembly = self.assembler.assemble(&outline)?;
        warnings.extend(assembly.warnings);

        let filename = suggested_filename(outline.title(), chrono::Local::now().naive_local());
        let stored = match self.publisher.publish(&assembly.bytes, &filename) {
            Ok(stored) => stored,
            Err(error) => {
                log::error!("Publishing {} failed: {}", filename, error);
                return Err(PipelineError::Publish {
                    error,
                    document: assembly.bytes,
                    filename,
                });
            }
        };

        Ok(Published {
            location: stored.location,
            filename: stored.filename,
            slide_count: outline.slides().len(),
            warnings,
        })
    }
}
