//! Folio test utilities.
//!
//! Helpers for integration testing: JSON document fixtures, block builders,
//! and assertion utilities for rendered output.

use serde_json::{Value as JsonValue, json};
use uuid::Uuid;

/// Create a test page with default values.
///
/// Pages start published with the default layout and no blocks.
pub fn test_page(title: &str) -> TestPage {
    TestPage {
        id: None,
        kind: "page".to_string(),
        title: title.to_string(),
        slug: String::new(),
        description: None,
        keywords: None,
        layout: "default".to_string(),
        is_published: true,
        blocks: Vec::new(),
    }
}

/// Create a test blog post with default values.
pub fn test_post(title: &str) -> TestPage {
    test_page(title).as_post()
}

/// A page document builder for creating test fixtures.
#[derive(Debug, Clone)]
pub struct TestPage {
    pub id: Option<Uuid>,
    pub kind: String,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub layout: String,
    pub is_published: bool,
    pub blocks: Vec<JsonValue>,
}

impl TestPage {
    /// Set a custom ID.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Make this a blog post.
    pub fn as_post(mut self) -> Self {
        self.kind = "post".to_string();
        self
    }

    /// Set an explicit slug.
    pub fn with_slug(mut self, slug: &str) -> Self {
        self.slug = slug.to_string();
        self
    }

    /// Set the layout key. Any string is accepted, including unknown keys.
    pub fn with_layout(mut self, layout: &str) -> Self {
        self.layout = layout.to_string();
        self
    }

    /// Set SEO metadata.
    pub fn with_seo(mut self, description: &str, keywords: &str) -> Self {
        self.description = Some(description.to_string());
        self.keywords = Some(keywords.to_string());
        self
    }

    /// Set as unpublished.
    pub fn unpublished(mut self) -> Self {
        self.is_published = false;
        self
    }

    /// Set as published.
    pub fn published(mut self) -> Self {
        self.is_published = true;
        self
    }

    /// Append a block record.
    pub fn with_block(mut self, block: JsonValue) -> Self {
        self.blocks.push(block);
        self
    }

    /// Serialize as a stored document record.
    pub fn to_json(&self) -> JsonValue {
        json!({
            "id": self.id,
            "kind": self.kind,
            "title": self.title,
            "slug": self.slug,
            "description": self.description,
            "keywords": self.keywords,
            "layout": self.layout,
            "is_published": self.is_published,
            "blocks": self.blocks,
        })
    }
}

/// Block record builders.
pub mod blocks {
    use serde_json::{Value, json};

    /// Any block record.
    pub fn block(id: &str, block_type: &str, content: Value) -> Value {
        json!({ "id": id, "type": block_type, "content": content })
    }

    pub fn heading(id: &str, text: &str, level: &str) -> Value {
        block(id, "heading", json!({ "text": text, "level": level }))
    }

    pub fn paragraph(id: &str, text: &str) -> Value {
        block(id, "paragraph", json!({ "text": text }))
    }

    pub fn image(id: &str, url: &str, alt: &str) -> Value {
        block(id, "image", json!({ "url": url, "alt": alt, "caption": "" }))
    }

    pub fn quote(id: &str, text: &str, author: &str) -> Value {
        block(id, "quote", json!({ "text": text, "author": author }))
    }

    pub fn columns(id: &str, left: &str, right: &str) -> Value {
        block(
            id,
            "columns",
            json!({ "columns": [{ "text": left }, { "text": right }] }),
        )
    }

    pub fn html(id: &str, code: &str) -> Value {
        block(id, "html", json!({ "code": code }))
    }
}

/// Assertion helpers for JSON content and rendered HTML.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that a JSON value equals expected.
    pub fn json_eq(actual: &Value, expected: &Value) {
        assert_eq!(
            actual,
            expected,
            "JSON mismatch:\nactual: {}\nexpected: {}",
            serde_json::to_string_pretty(actual).unwrap_or_default(),
            serde_json::to_string_pretty(expected).unwrap_or_default()
        );
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that `first` appears before `second` in `haystack`.
    pub fn appears_before(haystack: &str, first: &str, second: &str) {
        match (haystack.find(first), haystack.find(second)) {
            (Some(a), Some(b)) => assert!(
                a < b,
                "Expected '{first}' before '{second}'\nActual: {haystack}"
            ),
            _ => panic!("Expected both '{first}' and '{second}'\nActual: {haystack}"),
        }
    }
}
