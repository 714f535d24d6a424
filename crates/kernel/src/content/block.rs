//! Content block data model.
//!
//! A block is `{ id, type, content }` on the wire. The `type` tag selects one
//! of a closed set of variants, each with its own content record. Records
//! whose tag is outside the set are kept verbatim as [`BlockContent::Unknown`]
//! so that loading and saving a document never drops author data. Stored
//! content that does not fit its variant is read field by field: a field of
//! the wrong shape reads as empty and the rest of the block survives.

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// Identifier of a block within one document.
///
/// Opaque string; generated ids are UUIDv7 so they sort by creation time and
/// never collide in practice. Ids loaded from storage are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Generate a fresh, collision-resistant block id.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for BlockId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A block type tag that is not part of the implemented set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown block type '{0}'")]
pub struct UnknownBlockType(pub String);

/// The closed set of implemented block types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Heading,
    Paragraph,
    Image,
    Quote,
    Columns,
    Html,
}

impl BlockType {
    /// Every implemented type, in "add block" menu order.
    pub const ALL: [BlockType; 6] = [
        BlockType::Heading,
        BlockType::Paragraph,
        BlockType::Image,
        BlockType::Quote,
        BlockType::Columns,
        BlockType::Html,
    ];

    /// Wire tag for this type.
    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Heading => "heading",
            BlockType::Paragraph => "paragraph",
            BlockType::Image => "image",
            BlockType::Quote => "quote",
            BlockType::Columns => "columns",
            BlockType::Html => "html",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = UnknownBlockType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownBlockType(s.to_string()))
    }
}

/// Heading level. Anything unrecognized reads as `h2`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HeadingLevel {
    H1,
    #[default]
    H2,
    H3,
    H4,
}

impl HeadingLevel {
    pub const ALL: [HeadingLevel; 4] = [
        HeadingLevel::H1,
        HeadingLevel::H2,
        HeadingLevel::H3,
        HeadingLevel::H4,
    ];

    /// HTML tag name (`h1`..`h4`).
    pub fn as_str(self) -> &'static str {
        match self {
            HeadingLevel::H1 => "h1",
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
            HeadingLevel::H4 => "h4",
        }
    }

    /// Parse a level tag, falling back to `h2`.
    pub fn from_tag(tag: &str) -> Self {
        HeadingLevel::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(tag.trim()))
            .unwrap_or_default()
    }

    /// Accept "h3", 3, or garbage; garbage falls back to h2.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => HeadingLevel::from_tag(s),
            Value::Number(n) => match n.as_u64() {
                Some(1) => HeadingLevel::H1,
                Some(3) => HeadingLevel::H3,
                Some(4) => HeadingLevel::H4,
                _ => HeadingLevel::H2,
            },
            _ => HeadingLevel::H2,
        }
    }
}

impl Serialize for HeadingLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for HeadingLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(HeadingLevel::from_value(&Value::deserialize(deserializer)?))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingContent {
    pub text: String,
    pub level: HeadingLevel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParagraphContent {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageContent {
    pub url: String,
    pub alt: String,
    pub caption: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteContent {
    pub text: String,
    pub author: String,
}

/// One slot of a two-column block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSlot {
    pub text: String,
}

impl ColumnSlot {
    /// Read a stored slot; anything without a string `text` is an empty slot.
    fn salvage(value: &Value) -> Self {
        Self {
            text: lenient_text(value.get("text")),
        }
    }
}

/// Two-column text. Stored as an array; slots beyond the second are kept but
/// never rendered, missing slots render empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnsContent {
    pub columns: Vec<ColumnSlot>,
}

impl ColumnsContent {
    /// Number of rendered slots.
    pub const SLOTS: usize = 2;

    /// Text of slot `index`, empty when the slot is missing.
    pub fn slot_text(&self, index: usize) -> &str {
        self.columns.get(index).map_or("", |c| c.text.as_str())
    }
}

/// Raw markup, emitted subject to the renderer's raw HTML policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlContent {
    pub code: String,
}

/// A block whose type is not implemented, kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownContent {
    pub type_name: String,
    pub raw: Value,
}

/// Variant-specific block content.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    Heading(HeadingContent),
    Paragraph(ParagraphContent),
    Image(ImageContent),
    Quote(QuoteContent),
    Columns(ColumnsContent),
    Html(HtmlContent),
    Unknown(UnknownContent),
}

impl BlockContent {
    pub fn heading(text: impl Into<String>, level: HeadingLevel) -> Self {
        BlockContent::Heading(HeadingContent {
            text: text.into(),
            level,
        })
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        BlockContent::Paragraph(ParagraphContent { text: text.into() })
    }

    /// The implemented type, or `None` for unknown blocks.
    pub fn block_type(&self) -> Option<BlockType> {
        match self {
            BlockContent::Heading(_) => Some(BlockType::Heading),
            BlockContent::Paragraph(_) => Some(BlockType::Paragraph),
            BlockContent::Image(_) => Some(BlockType::Image),
            BlockContent::Quote(_) => Some(BlockType::Quote),
            BlockContent::Columns(_) => Some(BlockType::Columns),
            BlockContent::Html(_) => Some(BlockType::Html),
            BlockContent::Unknown(_) => None,
        }
    }

    /// Wire tag, including the raw tag of unknown blocks.
    pub fn type_name(&self) -> &str {
        match self {
            BlockContent::Unknown(u) => &u.type_name,
            other => other.block_type().map_or("", BlockType::as_str),
        }
    }

    /// Content record as JSON.
    pub fn to_value(&self) -> Value {
        let value = match self {
            BlockContent::Heading(c) => serde_json::to_value(c),
            BlockContent::Paragraph(c) => serde_json::to_value(c),
            BlockContent::Image(c) => serde_json::to_value(c),
            BlockContent::Quote(c) => serde_json::to_value(c),
            BlockContent::Columns(c) => serde_json::to_value(c),
            BlockContent::Html(c) => serde_json::to_value(c),
            BlockContent::Unknown(u) => return u.raw.clone(),
        };
        value.unwrap_or_default()
    }

    /// Parse content for a known type, strictly.
    pub fn parse(block_type: BlockType, content: Value) -> Result<Self, serde_json::Error> {
        // A missing content object means "all defaults".
        let content = if content.is_null() {
            Value::Object(Map::new())
        } else {
            content
        };
        Ok(match block_type {
            BlockType::Heading => BlockContent::Heading(serde_json::from_value(content)?),
            BlockType::Paragraph => BlockContent::Paragraph(serde_json::from_value(content)?),
            BlockType::Image => BlockContent::Image(serde_json::from_value(content)?),
            BlockType::Quote => BlockContent::Quote(serde_json::from_value(content)?),
            BlockType::Columns => BlockContent::Columns(serde_json::from_value(content)?),
            BlockType::Html => BlockContent::Html(serde_json::from_value(content)?),
        })
    }

    /// Rebuild content for a known type from whatever parts of `content` fit.
    ///
    /// String fields holding anything but a string read as empty. A
    /// non-array `columns` reads as no slots, and a slot that is not an object
    /// with string `text` reads as an empty slot. Never fails.
    pub fn salvage(block_type: BlockType, content: &Value) -> Self {
        let text = |key: &str| lenient_text(content.get(key));
        match block_type {
            BlockType::Heading => BlockContent::Heading(HeadingContent {
                text: text("text"),
                level: content
                    .get("level")
                    .map(HeadingLevel::from_value)
                    .unwrap_or_default(),
            }),
            BlockType::Paragraph => BlockContent::paragraph(text("text")),
            BlockType::Image => BlockContent::Image(ImageContent {
                url: text("url"),
                alt: text("alt"),
                caption: text("caption"),
            }),
            BlockType::Quote => BlockContent::Quote(QuoteContent {
                text: text("text"),
                author: text("author"),
            }),
            BlockType::Columns => BlockContent::Columns(ColumnsContent {
                columns: match content.get("columns") {
                    Some(Value::Array(slots)) => slots.iter().map(ColumnSlot::salvage).collect(),
                    _ => Vec::new(),
                },
            }),
            BlockType::Html => BlockContent::Html(HtmlContent { code: text("code") }),
        }
    }

    /// Build content from a stored `(type, content)` pair.
    ///
    /// Never fails: unknown tags become [`BlockContent::Unknown`] carrying
    /// the original data, and content that does not fit a known type is
    /// salvaged with [`BlockContent::salvage`].
    pub fn from_parts(type_name: &str, content: Value) -> Self {
        let Ok(block_type) = type_name.parse::<BlockType>() else {
            return BlockContent::Unknown(UnknownContent {
                type_name: type_name.to_string(),
                raw: content,
            });
        };
        match BlockContent::parse(block_type, content.clone()) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(
                    block_type = %block_type,
                    error = %e,
                    "block content does not match its type; reading mismatched fields as empty"
                );
                BlockContent::salvage(block_type, &content)
            }
        }
    }
}

fn lenient_text(value: Option<&Value>) -> String {
    value.and_then(Value::as_str).unwrap_or_default().to_string()
}

/// One typed, independently editable unit of page content.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawBlock")]
pub struct ContentBlock {
    pub id: BlockId,
    pub content: BlockContent,
}

impl ContentBlock {
    /// Create a block with a freshly generated id.
    pub fn new(content: BlockContent) -> Self {
        Self {
            id: BlockId::generate(),
            content,
        }
    }

    /// Create a block with a caller-provided id.
    pub fn with_id(id: impl Into<BlockId>, content: BlockContent) -> Self {
        Self {
            id: id.into(),
            content,
        }
    }

    pub fn type_name(&self) -> &str {
        self.content.type_name()
    }
}

/// Storage shape of a block record.
#[derive(Deserialize)]
struct RawBlock {
    id: BlockId,
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    content: Value,
}

impl From<RawBlock> for ContentBlock {
    fn from(raw: RawBlock) -> Self {
        Self {
            id: raw.id,
            content: BlockContent::from_parts(&raw.block_type, raw.content),
        }
    }
}

impl Serialize for ContentBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ContentBlock", 3)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("type", self.content.type_name())?;
        match &self.content {
            BlockContent::Heading(c) => state.serialize_field("content", c)?,
            BlockContent::Paragraph(c) => state.serialize_field("content", c)?,
            BlockContent::Image(c) => state.serialize_field("content", c)?,
            BlockContent::Quote(c) => state.serialize_field("content", c)?,
            BlockContent::Columns(c) => state.serialize_field("content", c)?,
            BlockContent::Html(c) => state.serialize_field("content", c)?,
            BlockContent::Unknown(u) => state.serialize_field("content", &u.raw)?,
        }
        state.end()
    }
}
