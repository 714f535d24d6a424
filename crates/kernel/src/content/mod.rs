//! Content blocks and the editing surface over them.
//!
//! This module provides:
//! - Block model: typed block content plus preserved unknown types
//! - Block registry: editor metadata and default content per block type
//! - BlockCollection: ordered add/update/move/remove over a document's blocks
//! - BlockRenderer: public and edit-mode HTML for blocks
//! - EditingSession: working copy of a document and its save path

pub mod block;
pub mod collection;
pub mod registry;
pub mod render;
mod session;

pub use block::{
    BlockContent, BlockId, BlockType, ColumnSlot, ColumnsContent, ContentBlock, HeadingContent,
    HeadingLevel, HtmlContent, ImageContent, ParagraphContent, QuoteContent, UnknownBlockType,
    UnknownContent,
};
pub use collection::{BlockCollection, MoveDirection};
pub use registry::{BlockDefinition, FormField, Widget};
pub use render::{BlockRenderer, RawHtmlPolicy, RenderMode};
pub use session::{EditingSession, SaveError};
