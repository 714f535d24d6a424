//! Block rendering.
//!
//! Turns a block into HTML in one of two modes:
//! - `Public`: what a visitor sees (also used for editor previews)
//! - `Edit`: the block's form descriptor as live-edit controls, followed by
//!   the public rendering of the same content
//!
//! Dispatch is an exhaustive match over [`BlockContent`]. Unknown blocks render
//! nothing publicly and a visible placeholder in edit mode; both are logged.

use std::fmt::Write as _;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::block::{
    BlockContent, ColumnsContent, ContentBlock, HeadingContent, HtmlContent, ImageContent,
    QuoteContent,
};
use super::registry::{self, FormField, Widget};
use crate::routes::helpers::html_escape;

/// Which view of a block to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Edit,
    #[default]
    Public,
}

/// How `html` blocks are emitted.
///
/// Raw markup crosses a trust boundary: authors write it, visitors run it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RawHtmlPolicy {
    /// Emit `code` verbatim. Only for sites where every author is trusted.
    Trusted,
    /// Clean `code` with ammonia before output.
    #[default]
    Sanitize,
}

impl FromStr for RawHtmlPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trusted" => Ok(RawHtmlPolicy::Trusted),
            "sanitize" => Ok(RawHtmlPolicy::Sanitize),
            other => Err(format!(
                "unknown raw HTML policy '{other}' (expected 'trusted' or 'sanitize')"
            )),
        }
    }
}

/// Accept http(s) and site-relative URLs for images.
fn is_safe_url(url: &str) -> bool {
    let trimmed = url.trim();
    trimmed.starts_with("https://")
        || trimmed.starts_with("http://")
        || (trimmed.starts_with('/') && !trimmed.starts_with("//"))
}

/// Renders blocks to HTML.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockRenderer {
    raw_html: RawHtmlPolicy,
}

impl BlockRenderer {
    pub fn new(raw_html: RawHtmlPolicy) -> Self {
        Self { raw_html }
    }

    pub fn raw_html_policy(&self) -> RawHtmlPolicy {
        self.raw_html
    }

    /// Render a sequence of blocks, each inside its own container.
    ///
    /// The container is emitted even when the block itself renders nothing.
    pub fn render_blocks(&self, blocks: &[ContentBlock], mode: RenderMode) -> String {
        let mut html = String::new();
        for block in blocks {
            let _ = write!(
                html,
                "<div class=\"block block-{}\" data-block-id=\"{}\">{}</div>",
                html_escape(block.type_name()),
                html_escape(block.id.as_str()),
                self.render(block, mode)
            );
        }
        html
    }

    /// Render one block without its container.
    pub fn render(&self, block: &ContentBlock, mode: RenderMode) -> String {
        match mode {
            RenderMode::Public => self.render_content(&block.content),
            RenderMode::Edit => self.render_edit(block),
        }
    }

    /// Public rendering of a block's content.
    pub fn render_content(&self, content: &BlockContent) -> String {
        match content {
            BlockContent::Heading(c) => render_heading(c),
            BlockContent::Paragraph(c) => format!("<p>{}</p>", html_escape(&c.text)),
            BlockContent::Image(c) => render_image(c),
            BlockContent::Quote(c) => render_quote(c),
            BlockContent::Columns(c) => render_columns(c),
            BlockContent::Html(c) => self.render_html(c),
            BlockContent::Unknown(u) => {
                warn!(block_type = %u.type_name, "no renderer for block type; rendering nothing");
                String::new()
            }
        }
    }

    /// Edit-mode rendering: toolbar, form controls, then a live preview.
    pub fn render_edit(&self, block: &ContentBlock) -> String {
        let id = html_escape(block.id.as_str());
        let toolbar = format!(
            "<div class=\"block-toolbar\">\
             <button type=\"button\" data-action=\"move-up\" data-block-id=\"{id}\">Move up</button>\
             <button type=\"button\" data-action=\"move-down\" data-block-id=\"{id}\">Move down</button>\
             <button type=\"button\" data-action=\"remove\" data-block-id=\"{id}\">Remove</button>\
             </div>"
        );

        let Some(block_type) = block.content.block_type() else {
            warn!(block_id = %block.id, block_type = %block.type_name(), "editing block of unsupported type");
            return format!(
                "{toolbar}<div class=\"block-unsupported\">Unsupported block type \
                 &ldquo;{}&rdquo;. It is not shown to visitors.</div>",
                html_escape(block.type_name())
            );
        };

        let definition = registry::definition(block_type);
        let mut html = format!(
            "{toolbar}<fieldset class=\"block-form\" data-block-id=\"{id}\" data-block-type=\"{block_type}\">\
             <legend>{}</legend>",
            definition.label
        );
        for field in definition.fields {
            html.push_str(&render_field(field, &field_value(&block.content, field)));
        }
        html.push_str("</fieldset>");
        let _ = write!(
            html,
            "<div class=\"block-preview\">{}</div>",
            self.render_content(&block.content)
        );
        html
    }

    fn render_html(&self, content: &HtmlContent) -> String {
        let markup = match self.raw_html {
            RawHtmlPolicy::Trusted => content.code.clone(),
            RawHtmlPolicy::Sanitize => ammonia::clean(&content.code),
        };
        format!("<div class=\"raw-html\">{markup}</div>")
    }
}

fn render_heading(c: &HeadingContent) -> String {
    let tag = c.level.as_str();
    format!("<{tag}>{}</{tag}>", html_escape(&c.text))
}

fn render_image(c: &ImageContent) -> String {
    let mut html = String::from("<figure>");
    if !c.url.is_empty() {
        if is_safe_url(&c.url) {
            let _ = write!(
                html,
                "<img src=\"{}\" alt=\"{}\">",
                html_escape(c.url.trim()),
                html_escape(&c.alt)
            );
        } else {
            warn!(url = %c.url, "refusing to render image with unsafe URL");
        }
    }
    if !c.caption.is_empty() {
        let _ = write!(html, "<figcaption>{}</figcaption>", html_escape(&c.caption));
    }
    html.push_str("</figure>");
    html
}

fn render_quote(c: &QuoteContent) -> String {
    let text = html_escape(&c.text);
    if c.author.is_empty() {
        format!("<blockquote><p>{text}</p></blockquote>")
    } else {
        format!(
            "<blockquote><p>{text}</p><cite>{}</cite></blockquote>",
            html_escape(&c.author)
        )
    }
}

fn render_columns(c: &ColumnsContent) -> String {
    let mut html = String::from("<div class=\"columns\">");
    for index in 0..ColumnsContent::SLOTS {
        let _ = write!(
            html,
            "<div class=\"column\">{}</div>",
            html_escape(c.slot_text(index))
        );
    }
    html.push_str("</div>");
    html
}

/// Current value of a form field, read from the block content.
fn field_value(content: &BlockContent, field: &FormField) -> String {
    let value = match (content, field.name) {
        (BlockContent::Heading(c), "text") => c.text.as_str(),
        (BlockContent::Heading(c), "level") => c.level.as_str(),
        (BlockContent::Paragraph(c), "text") => c.text.as_str(),
        (BlockContent::Image(c), "url") => c.url.as_str(),
        (BlockContent::Image(c), "alt") => c.alt.as_str(),
        (BlockContent::Image(c), "caption") => c.caption.as_str(),
        (BlockContent::Quote(c), "text") => c.text.as_str(),
        (BlockContent::Quote(c), "author") => c.author.as_str(),
        (BlockContent::Columns(c), "columns") => match field.widget {
            Widget::ColumnSlot { index } => c.slot_text(index),
            _ => "",
        },
        (BlockContent::Html(c), "code") => c.code.as_str(),
        _ => "",
    };
    value.to_string()
}

fn render_field(field: &FormField, value: &str) -> String {
    let name = field.name;
    let label = field.label;
    let value = html_escape(value);
    match field.widget {
        Widget::Text => format!(
            "<label>{label}<input type=\"text\" data-field=\"{name}\" value=\"{value}\"></label>"
        ),
        Widget::Url => format!(
            "<label>{label}<input type=\"url\" data-field=\"{name}\" value=\"{value}\"></label>"
        ),
        Widget::TextArea => format!(
            "<label>{label}<textarea data-field=\"{name}\">{value}</textarea></label>"
        ),
        Widget::Code => format!(
            "<label>{label}<textarea class=\"code\" spellcheck=\"false\" data-field=\"{name}\">{value}</textarea></label>"
        ),
        Widget::ColumnSlot { index } => format!(
            "<label>{label}<textarea data-field=\"{name}\" data-slot=\"{index}\">{value}</textarea></label>"
        ),
        Widget::Select { options } => {
            let mut html = format!("<label>{label}<select data-field=\"{name}\">");
            for option in options {
                let selected = if *option == value { " selected" } else { "" };
                let _ = write!(html, "<option value=\"{option}\"{selected}>{option}</option>");
            }
            html.push_str("</select></label>");
            html
        }
    }
}
