//! The model collaborator: anything that turns a topic into raw outline text.

use crate::error::SourceError;
use std::fs;
use std::path::PathBuf;

/// Produces raw model output for a topic.
///
/// The returned text is untrusted and goes through the validator.
pub trait OutlineSource {
    fn generate(&self, topic: &str) -> Result<String, SourceError>;
}

/// Reads a previously captured model response from disk.
///
/// The topic is ignored; this is how the CLI replays saved responses.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutlineSource for FileSource {
    fn generate(&self, _topic: &str) -> Result<String, SourceError> {
        log::debug!("Reading model output from {}", self.path.display());
        let text = fs::read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Err(SourceError::Empty);
        }
        Ok(text)
    }
}

/// Returns the same text for every topic.
#[derive(Debug, Clone)]
pub struct StaticSource {
    text: String,
}

impl StaticSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl OutlineSource for StaticSource {
    fn generate(&self, _topic: &str) -> Result<String, SourceError> {
        if self.text.trim().is_empty() {
            return Err(SourceError::Empty);
        }
        Ok(self.text.clone())
    }
}
