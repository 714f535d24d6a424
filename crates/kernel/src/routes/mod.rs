//! HTTP route handlers.

pub mod editor;
pub mod health;
pub mod helpers;
pub mod page;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::state::AppState;

/// Build the full application router.
///
/// Editor routes are mounted only when an editor token is configured.
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(health::router())
        .merge(page::router());

    if state.editor_token().is_some() {
        // TraceLayer → editor_token → editor routes
        router = router.merge(editor::router().route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::require_editor_token,
        )));
    } else {
        info!("EDITOR_TOKEN not set; editor API disabled");
    }

    router
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn fallback(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> axum::response::Response {
    helpers::not_found_page(&state)
}
