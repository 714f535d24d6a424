//! Page composer.
//!
//! Glue between a fetched document, the layout it names, and the block
//! renderer. It decides nothing on its own beyond passing the render mode down.

use anyhow::Result;

use super::layout::{Layout, LayoutEngine, PageFrame};
use crate::content::{BlockRenderer, RenderMode};
use crate::fetch::FetchState;
use crate::models::PageDocument;

/// What a view shows for a given fetch state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposedView {
    /// Fully rendered document.
    Page(String),
    /// Rendered not-found page.
    NotFound(String),
    /// Rendered error page; the message is also logged by the fetcher.
    Error(String),
    /// Rendered loading placeholder.
    Loading(String),
    /// Nothing requested yet.
    Empty,
}

impl ComposedView {
    pub fn html(&self) -> Option<&str> {
        match self {
            ComposedView::Page(html)
            | ComposedView::NotFound(html)
            | ComposedView::Error(html)
            | ComposedView::Loading(html) => Some(html),
            ComposedView::Empty => None,
        }
    }
}

/// Renders whole pages.
pub struct PageComposer {
    layouts: LayoutEngine,
    renderer: BlockRenderer,
}

impl PageComposer {
    pub fn new(layouts: LayoutEngine, renderer: BlockRenderer) -> Self {
        Self { layouts, renderer }
    }

    pub fn layouts(&self) -> &LayoutEngine {
        &self.layouts
    }

    pub fn renderer(&self) -> &BlockRenderer {
        &self.renderer
    }

    /// Render `document` inside its layout.
    pub fn compose(&self, document: &PageDocument, mode: RenderMode) -> Result<String> {
        let body = self
            .renderer
            .render_blocks(document.blocks.as_slice(), mode);
        let frame = PageFrame {
            title: document.title.clone(),
            description: document.description.clone(),
            keywords: document.keywords.clone(),
            body,
            body_class: (mode == RenderMode::Edit).then(|| "editing".to_string()),
        };
        self.layouts.wrap(document.layout, &frame)
    }

    /// Map a fetch state to the view it should produce.
    pub fn compose_state(&self, state: &FetchState, mode: RenderMode) -> Result<ComposedView> {
        Ok(match state {
            FetchState::Idle => ComposedView::Empty,
            FetchState::Loading { .. } => ComposedView::Loading(self.message_page(
                "Loading",
                "<p class=\"loading\">Loading&hellip;</p>",
            )?),
            FetchState::Loaded(document) => ComposedView::Page(self.compose(document, mode)?),
            FetchState::NotFound { .. } => ComposedView::NotFound(self.not_found_page()?),
            FetchState::Error { message, .. } => ComposedView::Error(self.message_page(
                "Error",
                &format!(
                    "<h1>Something went wrong</h1><p class=\"error\">{}</p>",
                    crate::routes::helpers::html_escape(message)
                ),
            )?),
        })
    }

    /// Standalone not-found page.
    pub fn not_found_page(&self) -> Result<String> {
        self.message_page(
            "Page not found",
            "<h1>Page not found</h1><p>The page you requested does not exist.</p>",
        )
    }

    fn message_page(&self, title: &str, body: &str) -> Result<String> {
        let frame = PageFrame {
            title: title.to_string(),
            body: body.to_string(),
            ..PageFrame::default()
        };
        self.layouts.wrap(Layout::Default, &frame)
    }
}
