//! Error types for outline parsing, deck rendering, and publishing.
//!
//! Content-level problems (a bad slide, a missing image) never show up here;
//! they are absorbed as warnings. These types cover the structural failures
//! that end a request.

use thiserror::Error;

/// The model output could not be turned into an outline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// No balanced `{ ... }` block exists anywhere in the text.
    #[error("no structured outline found in model output")]
    NoStructureFound,

    /// A block was found but is not valid JSON of the expected shape.
    #[error("malformed outline structure: {0}")]
    MalformedStructure(String),

    /// Every slide was dropped during validation.
    #[error("outline contains no usable slides")]
    EmptyDeck,
}

/// The in-memory document could not be serialized.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Writing an XML part failed.
    #[error("XML serialization error: {0}")]
    Xml(String),

    /// Writing the ZIP container failed.
    #[error("ZIP packaging error: {0}")]
    Zip(String),

    /// Underlying buffer write failed.
    #[error("I/O error while serializing: {0}")]
    Io(#[from] std::io::Error),
}

/// The storage collaborator refused or failed to store the document.
#[derive(Error, Debug)]
pub enum PublishError {
    /// Network or filesystem failure.
    #[error("failed to store document: {0}")]
    Io(#[from] std::io::Error),

    /// The destination exists but we may not write to it.
    #[error("permission denied writing to {0}")]
    PermissionDenied(String),

    /// The destination rejected the request (bad name, quota, ...).
    #[error("publish rejected: {0}")]
    Rejected(String),
}

/// The model collaborator failed to return any text.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Reading a stored response failed.
    #[error("failed to read model output: {0}")]
    Io(#[from] std::io::Error),

    /// The model returned nothing.
    #[error("model returned an empty response")]
    Empty,
}
