//! Core domain types, model-output repair, and collaborator traits
//! for generating slide decks from a topic.

pub mod error;
pub mod markup;
pub mod normalize;
pub mod prompt;
pub mod publish;
pub mod source;
pub mod types;
pub mod validate;

pub use error::{PublishError, RenderError, SchemaError, SourceError};
pub use normalize::TextCleaner;
pub use prompt::outline_prompt;
pub use publish::{suggested_filename, DirectoryPublisher, Publisher, Stored};
pub use source::{FileSource, OutlineSource, StaticSource};
pub use types::{Outline, SlideKind, SlideSpec, Validated, DEFAULT_AUTHOR, DEFAULT_TITLE};
pub use validate::{parse, OutlineParser};
