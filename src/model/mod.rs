//! Style and document model types.
//!
//! The style types ([`FontStyle`], [`ParagraphStyle`], [`ParagraphFormat`])
//! are what the importer resolves and hands to a sink. [`Document`] is an
//! in-memory sink that collects imported fragments into paragraphs.

mod document;
mod paragraph;
mod resource;
mod style;

pub use document::Document;
pub use paragraph::{
    Alignment, BulletSpec, BulletStyle, InlineContent, LineSpacing, Paragraph, ParagraphFormat,
    ParagraphStyle, TextRun,
};
pub use resource::{EmbeddedImage, ImageType};
pub use style::{Color, FontStyle};
