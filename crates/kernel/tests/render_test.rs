#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Block renderer, layout and composer tests.

use folio_kernel::content::{
    BlockCollection, BlockRenderer, BlockType, ContentBlock, RawHtmlPolicy, RenderMode, registry,
};
use folio_kernel::models::{DocumentKind, PageDocument};
use folio_kernel::theme::{ChromeSettings, Layout, LayoutEngine, PageComposer};
use folio_test_utils::{assert, blocks, test_page};
use serde_json::{Value, json};

fn block(record: Value) -> ContentBlock {
    serde_json::from_value(record).unwrap()
}

fn document(fixture: &folio_test_utils::TestPage) -> PageDocument {
    serde_json::from_value(fixture.to_json()).unwrap()
}

fn composer(policy: RawHtmlPolicy) -> PageComposer {
    PageComposer::new(
        LayoutEngine::new(ChromeSettings::default()).unwrap(),
        BlockRenderer::new(policy),
    )
}

#[test]
fn test_every_type_renders_default_content() {
    let renderer = BlockRenderer::default();
    for block_type in BlockType::ALL {
        let html = renderer.render_content(&registry::default_content(block_type));
        assert!(!html.is_empty(), "{block_type} rendered nothing");
    }
}

#[test]
fn test_unknown_type_renders_nothing_publicly() {
    let renderer = BlockRenderer::default();
    let unknown = block(blocks::block("x", "youtube", json!({ "url": "https://example.com" })));

    assert_eq!(renderer.render(&unknown, RenderMode::Public), "");

    let edit = renderer.render(&unknown, RenderMode::Edit);
    assert::contains(&edit, "block-unsupported");
    assert::contains(&edit, "youtube");
}

#[test]
fn test_containers_are_kept_for_every_block() {
    let renderer = BlockRenderer::default();
    let c: BlockCollection = serde_json::from_value(json!([
        blocks::paragraph("p", "Hi"),
        blocks::block("u", "checklist", json!({})),
    ]))
    .unwrap();

    let html = renderer.render_blocks(c.as_slice(), RenderMode::Public);
    assert::contains(&html, "<div class=\"block block-paragraph\" data-block-id=\"p\"><p>Hi</p></div>");
    assert::contains(&html, "<div class=\"block block-checklist\" data-block-id=\"u\"></div>");
}

#[test]
fn test_text_is_escaped() {
    let renderer = BlockRenderer::default();
    let html = renderer.render(
        &block(blocks::heading("h", "<script>x</script>", "h1")),
        RenderMode::Public,
    );
    assert_eq!(html, "<h1>&lt;script&gt;x&lt;/script&gt;</h1>");
}

#[test]
fn test_heading_level_falls_back_to_h2() {
    let renderer = BlockRenderer::default();
    let html = renderer.render(
        &block(blocks::heading("h", "Title", "h9")),
        RenderMode::Public,
    );
    assert_eq!(html, "<h2>Title</h2>");
}

#[test]
fn test_bad_part_renders_empty_and_keeps_the_block() {
    let renderer = BlockRenderer::default();
    let render = |record: Value| renderer.render(&block(record), RenderMode::Public);

    assert_eq!(
        render(blocks::block("c", "columns", json!({ "columns": [null, { "text": "Right" }] }))),
        "<div class=\"columns\"><div class=\"column\"></div><div class=\"column\">Right</div></div>"
    );
    assert_eq!(
        render(blocks::block("c", "columns", json!({ "columns": [{ "text": "Left" }, "oops"] }))),
        "<div class=\"columns\"><div class=\"column\">Left</div><div class=\"column\"></div></div>"
    );
    assert_eq!(
        render(blocks::block("h", "heading", json!({ "text": null, "level": "h1" }))),
        "<h1></h1>"
    );
    assert_eq!(
        render(blocks::block("q", "quote", json!({ "text": "Be kind", "author": null }))),
        "<blockquote><p>Be kind</p></blockquote>"
    );
}

#[test]
fn test_raw_html_policy() {
    let code = "<p onclick=\"steal()\">Hi</p><script>alert(1)</script>";
    let raw = block(blocks::html("r", code));

    let sanitized = BlockRenderer::new(RawHtmlPolicy::Sanitize).render(&raw, RenderMode::Public);
    assert::contains(&sanitized, "<p>Hi</p>");
    assert::not_contains(&sanitized, "<script>");
    assert::not_contains(&sanitized, "onclick");

    let trusted = BlockRenderer::new(RawHtmlPolicy::Trusted).render(&raw, RenderMode::Public);
    assert::contains(&trusted, code);
}

#[test]
fn test_image_with_unsafe_url_is_dropped() {
    let renderer = BlockRenderer::default();
    let html = renderer.render(
        &block(blocks::image("i", "javascript:alert(1)", "x")),
        RenderMode::Public,
    );
    assert::not_contains(&html, "<img");

    let html = renderer.render(
        &block(blocks::image("i", "https://example.com/a.png", "A")),
        RenderMode::Public,
    );
    assert::contains(&html, "<img src=\"https://example.com/a.png\" alt=\"A\">");
}

#[test]
fn test_edit_mode_renders_form_and_preview() {
    let renderer = BlockRenderer::default();
    let html = renderer.render(
        &block(blocks::quote("q", "Be kind", "Anon")),
        RenderMode::Edit,
    );
    assert::contains(&html, "data-action=\"move-up\"");
    assert::contains(&html, "data-field=\"text\"");
    assert::contains(&html, "data-field=\"author\"");
    assert::appears_before(&html, "block-form", "block-preview");
    assert::contains(&html, "<cite>Anon</cite>");
}

#[test]
fn test_bogus_layout_matches_default() {
    let c = composer(RawHtmlPolicy::Sanitize);
    let bogus = document(&test_page("About").with_layout("bogus"));
    let default = document(&test_page("About").with_layout("default"));

    assert_eq!(bogus.layout, Layout::Default);
    assert_eq!(
        c.compose(&bogus, RenderMode::Public).unwrap(),
        c.compose(&default, RenderMode::Public).unwrap()
    );
}

#[test]
fn test_composed_page_carries_seo_and_order() {
    let c = composer(RawHtmlPolicy::Sanitize);
    let doc = document(
        &test_page("Services")
            .with_layout("landing")
            .with_seo("What we do", "consulting, training")
            .with_block(blocks::heading("h", "Our services", "h1"))
            .with_block(blocks::columns("c", "Consulting", "Training")),
    );

    let html = c.compose(&doc, RenderMode::Public).unwrap();
    assert::contains(&html, "<title>Services | Folio</title>");
    assert::contains(&html, "<meta name=\"description\" content=\"What we do\">");
    assert::contains(&html, "layout-landing");
    assert::appears_before(&html, "Our services", "Consulting");
    assert::appears_before(&html, "Consulting", "Training");
}

#[test]
fn test_composer_edit_mode_passes_through() {
    let c = composer(RawHtmlPolicy::Sanitize);
    let mut doc = PageDocument::new(DocumentKind::Page);
    doc.title = "Draft".to_string();
    doc.blocks.add_block(BlockType::Paragraph);

    let html = c.compose(&doc, RenderMode::Edit).unwrap();
    assert::contains(&html, "editing");
    assert::contains(&html, "block-form");
}
