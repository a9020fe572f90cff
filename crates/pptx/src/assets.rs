//! Image lookup for `image_text` slides.
//!
//! The outline only carries an opaque `image_ref`. An [`AssetResolver`] turns
//! it into bytes; the renderer falls back to a placeholder graphic when that
//! fails or the bytes are not an image we can embed.

use image::ImageReader;
use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Why an image reference could not be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct AssetError(pub String);

/// Resolves an outline image reference to raw image bytes.
pub trait AssetResolver {
    fn resolve(&self, image_ref: &str) -> Result<Vec<u8>, AssetError>;
}

/// Resolver that knows no images; every image slide gets a placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetResolver for NoAssets {
    fn resolve(&self, image_ref: &str) -> Result<Vec<u8>, AssetError> {
        Err(AssetError(format!("no asset store configured for '{}'", image_ref)))
    }
}

/// In-memory assets keyed by reference.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    assets: HashMap<String, Vec<u8>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bytes under a reference.
    pub fn insert(&mut self, image_ref: impl Into<String>, bytes: Vec<u8>) {
        self.assets.insert(image_ref.into(), bytes);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, image_ref: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(image_ref, bytes);
        self
    }
}

impl AssetResolver for MemoryAssets {
    fn resolve(&self, image_ref: &str) -> Result<Vec<u8>, AssetError> {
        self.assets
            .get(image_ref)
            .cloned()
            .ok_or_else(|| AssetError(format!("unknown asset '{}'", image_ref)))
    }
}

/// Reads images from files below a base directory.
///
/// References are relative paths; absolute paths and `..` are refused so an
/// outline cannot reach outside the asset directory.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    base: PathBuf,
}

impl DirectoryAssets {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl AssetResolver for DirectoryAssets {
    fn resolve(&self, image_ref: &str) -> Result<Vec<u8>, AssetError> {
        let relative = Path::new(image_ref);
        let confined = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !confined {
            return Err(AssetError(format!(
                "asset reference '{}' escapes the asset directory",
                image_ref
            )));
        }

        let path = self.base.join(relative);
        fs::read(&path).map_err(|e| AssetError(format!("{}: {}", path.display(), e)))
    }
}

/// Image formats that can be embedded as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
}

impl ImageFormat {
    /// Detect the format from the leading bytes. Formats a deck cannot embed
    /// directly yield `None`.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        match image::guess_format(bytes).ok()? {
            image::ImageFormat::Png => Some(Self::Png),
            image::ImageFormat::Jpeg => Some(Self::Jpeg),
            image::ImageFormat::Gif => Some(Self::Gif),
            _ => None,
        }
    }

    fn codec(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Gif => image::ImageFormat::Gif,
        }
    }

    /// File extension used for the media part.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
        }
    }

    /// MIME type registered in `[Content_Types].xml`.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
        }
    }

    /// All embeddable formats.
    pub fn all() -> [Self; 3] {
        [Self::Png, Self::Jpeg, Self::Gif]
    }
}

/// Pixel dimensions from the image header, without decoding pixel data.
pub fn image_size(format: ImageFormat, bytes: &[u8]) -> Option<(u32, u32)> {
    match ImageReader::with_format(Cursor::new(bytes), format.codec()).into_dimensions() {
        Ok(size) => Some(size),
        Err(e) => {
            log::debug!("Could not read {:?} dimensions: {}", format, e);
            None
        }
    }
}
