#![allow(clippy::unwrap_used, clippy::expect_used)]
//! HTTP route tests.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use folio_kernel::config::Config;
use folio_kernel::gateway::PageGateway;
use folio_test_utils::{assert, blocks, test_page};

use common::{TestApp, body_json, body_string};

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["store"], "memory");
}

#[tokio::test]
async fn test_published_page_is_served() {
    let app = TestApp::new();
    app.seed(
        &test_page("About Us")
            .with_layout("sidebar")
            .with_block(blocks::heading("h", "Welcome", "h1"))
            .with_block(blocks::paragraph("p", "We build things.")),
    )
    .await;

    let response = app.get("/page/about-us").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert::contains(&html, "<title>About Us | Folio</title>");
    assert::contains(&html, "<aside class=\"sidebar\">");
    assert::appears_before(&html, "Welcome", "We build things.");
}

#[tokio::test]
async fn test_unpublished_page_is_not_found() {
    let app = TestApp::new();
    app.seed(&test_page("Secret").unpublished()).await;

    let response = app.get("/page/secret").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert::contains(&body_string(response).await, "Page not found");
}

#[tokio::test]
async fn test_blog_route_serves_posts_only() {
    let app = TestApp::new();
    app.seed(&test_page("Launch Day").as_post()).await;

    assert_eq!(app.get("/blog/launch-day").await.status(), StatusCode::OK);
    assert_eq!(
        app.get("/page/launch-day").await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_editor_requires_token() {
    let app = TestApp::new();

    let missing = app
        .request(
            Request::post("/admin/sessions")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(missing).await["error"], "Missing editor token");

    let wrong = app
        .request(
            Request::get("/admin/block-types")
                .header("x-editor-token", "nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(wrong).await["error"], "Invalid editor token");
}

#[tokio::test]
async fn test_editor_routes_absent_without_token() {
    let app = TestApp::with_config(Config::default());
    let response = app.editor("GET", "/admin/block-types", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_block_types_lists_implemented_types() {
    let app = TestApp::new();
    let response = app.editor("GET", "/admin/block-types", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let types: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["type"].as_str().unwrap())
        .collect();
    assert_eq!(
        types,
        ["heading", "paragraph", "image", "quote", "columns", "html"]
    );
    assert!(json[0]["fields"].as_array().is_some_and(|f| !f.is_empty()));
}

#[tokio::test]
async fn test_author_and_publish_flow() {
    let app = TestApp::new();
    let sid = app.open_session(None).await;
    let base = format!("/admin/sessions/{sid}");

    let response = app
        .editor(
            "PUT",
            &format!("{base}/fields"),
            Some(json!({ "title": "Hello, World!", "layout": "fullwidth" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .editor(
            "POST",
            &format!("{base}/blocks"),
            Some(json!({ "type": "heading" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let heading_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .editor(
            "PATCH",
            &format!("{base}/blocks/{heading_id}"),
            Some(json!({ "text": "Greetings" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let edit = body_string(app.editor("GET", &format!("{base}/edit"), None).await).await;
    assert::contains(&edit, "block-toolbar");

    // Saved but unpublished: still hidden.
    let response = app.editor("POST", &format!("{base}/save"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let saved = body_json(response).await;
    assert_eq!(saved["slug"], "hello-world");
    assert_eq!(
        app.get("/page/hello-world").await.status(),
        StatusCode::NOT_FOUND
    );

    app.editor(
        "PUT",
        &format!("{base}/fields"),
        Some(json!({ "is_published": true })),
    )
    .await;
    app.editor("POST", &format!("{base}/save"), None).await;

    let response = app.get("/page/hello-world").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert::contains(&html, "<h2>Greetings</h2>");
    assert::contains(&html, "layout-fullwidth");
}

#[tokio::test]
async fn test_save_without_title_is_unprocessable() {
    let app = TestApp::new();
    let sid = app.open_session(Some(json!({ "kind": "post" }))).await;

    let response = app
        .editor("POST", &format!("/admin/sessions/{sid}/save"), None)
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["errors"][0]["code"], "missing_title");
    assert!(app.gateway.is_empty());
}

#[tokio::test]
async fn test_block_mutation_errors() {
    let app = TestApp::new();
    let sid = app.open_session(None).await;
    let base = format!("/admin/sessions/{sid}");

    let response = app
        .editor(
            "POST",
            &format!("{base}/blocks"),
            Some(json!({ "type": "youtube" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .editor(
            "POST",
            &format!("{base}/blocks/missing/move"),
            Some(json!({ "direction": "up" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .editor("DELETE", &format!("{base}/blocks/missing"), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_move_at_top_reports_unchanged() {
    let app = TestApp::new();
    let sid = app.open_session(None).await;
    let base = format!("/admin/sessions/{sid}");

    let response = app
        .editor(
            "POST",
            &format!("{base}/blocks"),
            Some(json!({ "type": "paragraph" })),
        )
        .await;
    let id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .editor(
            "POST",
            &format!("{base}/blocks/{id}/move"),
            Some(json!({ "direction": "up" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["changed"], false);
}

#[tokio::test]
async fn test_edit_existing_and_delete() {
    let app = TestApp::new();
    let id = app.seed(&test_page("Old Title")).await;

    let sid = app.open_session(Some(json!({ "id": id }))).await;
    let doc = body_json(
        app.editor("GET", &format!("/admin/sessions/{sid}"), None)
            .await,
    )
    .await;
    assert_eq!(doc["document"]["title"], "Old Title");

    let response = app
        .editor("DELETE", &format!("/admin/pages/{id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(app.gateway.find_by_id(id).await.unwrap().is_none());

    let response = app
        .editor("DELETE", &format!("/admin/sessions/{sid}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = app
        .editor("GET", &format!("/admin/sessions/{sid}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
