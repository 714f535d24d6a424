#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Builds the REAL kernel router and state over an in-memory document store,
//! so every test gets an isolated app without external services.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use folio_kernel::config::Config;
use folio_kernel::gateway::{MemoryPageGateway, PageGateway};
use folio_kernel::middleware::EDITOR_TOKEN_HEADER;
use folio_kernel::models::PageDocument;
use folio_kernel::routes;
use folio_kernel::state::AppState;

/// Editor token configured on every test app.
pub const TEST_EDITOR_TOKEN: &str = "test-editor-token";

/// Test application wrapper using the REAL kernel routes and state.
pub struct TestApp {
    router: Router,
    pub gateway: Arc<MemoryPageGateway>,
    pub state: AppState,
}

impl TestApp {
    /// Create an app with the editor API enabled.
    pub fn new() -> Self {
        Self::with_config(Config {
            editor_token: Some(TEST_EDITOR_TOKEN.to_string()),
            ..Config::default()
        })
    }

    /// Create an app from an explicit configuration.
    pub fn with_config(config: Config) -> Self {
        let gateway = Arc::new(MemoryPageGateway::new());
        let state = AppState::new(&config, gateway.clone() as Arc<dyn PageGateway>)
            .expect("Failed to initialize AppState");
        let router = routes::app(state.clone());
        Self {
            router,
            gateway,
            state,
        }
    }

    /// Store a document fixture directly and return its id.
    pub async fn seed(&self, fixture: &folio_test_utils::TestPage) -> Uuid {
        let mut doc: PageDocument =
            serde_json::from_value(fixture.to_json()).expect("Invalid document fixture");
        doc.slug = doc.effective_slug();
        self.gateway.insert(&doc).await.expect("Failed to seed document")
    }

    /// Send a request to the test application.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request")
    }

    /// Send an editor API request carrying the editor token.
    pub async fn editor(&self, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(EDITOR_TOKEN_HEADER, TEST_EDITOR_TOKEN);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");
        self.request(request).await
    }

    /// GET a path without credentials.
    pub async fn get(&self, uri: &str) -> Response {
        self.request(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    /// Open an editing session and return its id.
    pub async fn open_session(&self, body: Option<Value>) -> Uuid {
        let response = self.editor("POST", "/admin/sessions", body).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        json["session_id"].as_str().unwrap().parse().unwrap()
    }
}

/// Read a response body as a string.
pub async fn body_string(response: Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

/// Read a response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let body = body_string(response).await;
    serde_json::from_str(&body).unwrap_or_else(|e| panic!("Body is not JSON ({e}): {body}"))
}
