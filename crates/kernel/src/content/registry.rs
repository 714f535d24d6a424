//! Block variant registry.
//!
//! Static mapping from each implemented [`BlockType`] to its label, default
//! content, and the form descriptor the editor renders for it. Every lookup is
//! an exhaustive match, so adding a type fails to compile until it has a
//! definition here and a renderer in `render`.

use serde::Serialize;

use super::block::{
    BlockContent, BlockType, ColumnSlot, ColumnsContent, HeadingContent, HeadingLevel,
    HtmlContent, ImageContent, ParagraphContent, QuoteContent,
};

/// Input widget used for one editable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Widget {
    Text,
    TextArea,
    Url,
    Select { options: &'static [&'static str] },
    Code,
    /// One slot of the `columns` array.
    ColumnSlot { index: usize },
}

/// One editable field of a block type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormField {
    /// Content field the input writes to.
    pub name: &'static str,
    pub label: &'static str,
    pub widget: Widget,
}

/// Editor metadata for a block type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockDefinition {
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub label: &'static str,
    pub fields: &'static [FormField],
}

const HEADING_LEVELS: &[&str] = &["h1", "h2", "h3", "h4"];

static HEADING: BlockDefinition = BlockDefinition {
    block_type: BlockType::Heading,
    label: "Heading",
    fields: &[
        FormField {
            name: "text",
            label: "Text",
            widget: Widget::Text,
        },
        FormField {
            name: "level",
            label: "Level",
            widget: Widget::Select {
                options: HEADING_LEVELS,
            },
        },
    ],
};

static PARAGRAPH: BlockDefinition = BlockDefinition {
    block_type: BlockType::Paragraph,
    label: "Paragraph",
    fields: &[FormField {
        name: "text",
        label: "Text",
        widget: Widget::TextArea,
    }],
};

static IMAGE: BlockDefinition = BlockDefinition {
    block_type: BlockType::Image,
    label: "Image",
    fields: &[
        FormField {
            name: "url",
            label: "Image URL",
            widget: Widget::Url,
        },
        FormField {
            name: "alt",
            label: "Alt text",
            widget: Widget::Text,
        },
        FormField {
            name: "caption",
            label: "Caption",
            widget: Widget::Text,
        },
    ],
};

static QUOTE: BlockDefinition = BlockDefinition {
    block_type: BlockType::Quote,
    label: "Quote",
    fields: &[
        FormField {
            name: "text",
            label: "Quote",
            widget: Widget::TextArea,
        },
        FormField {
            name: "author",
            label: "Author",
            widget: Widget::Text,
        },
    ],
};

static COLUMNS: BlockDefinition = BlockDefinition {
    block_type: BlockType::Columns,
    label: "Two Columns",
    fields: &[
        FormField {
            name: "columns",
            label: "Left column",
            widget: Widget::ColumnSlot { index: 0 },
        },
        FormField {
            name: "columns",
            label: "Right column",
            widget: Widget::ColumnSlot { index: 1 },
        },
    ],
};

static HTML: BlockDefinition = BlockDefinition {
    block_type: BlockType::Html,
    label: "HTML",
    fields: &[FormField {
        name: "code",
        label: "Markup",
        widget: Widget::Code,
    }],
};

/// Look up the definition of a block type.
pub fn definition(block_type: BlockType) -> &'static BlockDefinition {
    match block_type {
        BlockType::Heading => &HEADING,
        BlockType::Paragraph => &PARAGRAPH,
        BlockType::Image => &IMAGE,
        BlockType::Quote => &QUOTE,
        BlockType::Columns => &COLUMNS,
        BlockType::Html => &HTML,
    }
}

/// All definitions, in "add block" menu order.
pub fn definitions() -> impl Iterator<Item = &'static BlockDefinition> {
    BlockType::ALL.into_iter().map(definition)
}

/// Content a freshly added block starts with.
pub fn default_content(block_type: BlockType) -> BlockContent {
    match block_type {
        BlockType::Heading => BlockContent::Heading(HeadingContent {
            text: "New Heading".to_string(),
            level: HeadingLevel::H2,
        }),
        BlockType::Paragraph => BlockContent::Paragraph(ParagraphContent {
            text: "New paragraph text.".to_string(),
        }),
        BlockType::Image => BlockContent::Image(ImageContent::default()),
        BlockType::Quote => BlockContent::Quote(QuoteContent {
            text: "New quote".to_string(),
            author: String::new(),
        }),
        BlockType::Columns => BlockContent::Columns(ColumnsContent {
            columns: vec![
                ColumnSlot {
                    text: "Left column text.".to_string(),
                },
                ColumnSlot {
                    text: "Right column text.".to_string(),
                },
            ],
        }),
        BlockType::Html => BlockContent::Html(HtmlContent {
            code: "<!-- -->".to_string(),
        }),
    }
}
