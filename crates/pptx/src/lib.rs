//! PPTX (Office Open XML) rendering for validated slide outlines.
//!
//! A [`DocumentBuilder`] collects slides produced by [`render`]; the
//! [`Assembler`] drives it over a whole [`deck_core::Outline`] and packages
//! the result. [`Pipeline`] strings a model source, the parser, the assembler
//! and a publisher together.

pub mod assemble;
pub mod assets;
pub mod document;
pub mod layout;
mod package;
pub mod pipeline;
pub mod render;
mod templates;
mod xml;

pub use assemble::{assemble, Assembler, Assembly};
pub use assets::{AssetError, AssetResolver, DirectoryAssets, ImageFormat, MemoryAssets, NoAssets};
pub use document::{DocumentBuilder, RenderedSlide};
pub use layout::Layout;
pub use pipeline::{Pipeline, PipelineError, Published};
pub use render::render;

/// Result type for rendering and packaging.
pub type Result<T> = std::result::Result<T, deck_core::RenderError>;
