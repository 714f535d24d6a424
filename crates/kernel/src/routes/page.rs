//! Public page route handlers.
//!
//! Serves published pages at `/page/{slug}` and published blog posts at
//! `/blog/{slug}`. Unpublished documents are indistinguishable from missing
//! ones.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};

use crate::content::RenderMode;
use crate::error::AppError;
use crate::fetch::{FetchKey, fetch_document};
use crate::models::DocumentKind;
use crate::state::AppState;
use crate::theme::ComposedView;

use super::helpers::not_found_page;

/// Create the public page router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/page/{slug}", get(view_page))
        .route("/blog/{slug}", get(view_post))
}

async fn view_page(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    render_published(&state, DocumentKind::Page, slug).await
}

async fn view_post(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    render_published(&state, DocumentKind::Post, slug).await
}

async fn render_published(state: &AppState, kind: DocumentKind, slug: String) -> Response {
    let key = FetchKey::slug(kind, slug);
    let fetched = fetch_document(state.gateway().as_ref(), &key).await;

    let view = match state.composer().compose_state(&fetched, RenderMode::Public) {
        Ok(view) => view,
        Err(e) => return AppError::Internal(e).into_response(),
    };

    match view {
        ComposedView::Page(html) => Html(html).into_response(),
        ComposedView::NotFound(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        ComposedView::Error(html) => {
            (StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response()
        }
        // A one-shot fetch always settles.
        ComposedView::Loading(_) | ComposedView::Empty => not_found_page(state),
    }
}
