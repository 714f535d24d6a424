//! Editor token authentication middleware.
//!
//! Checks the `x-editor-token` header against the configured secret before
//! any editor route runs.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the editor secret.
pub const EDITOR_TOKEN_HEADER: &str = "x-editor-token";

/// Middleware that rejects requests without a matching editor token.
///
/// - Matching token -> passes through
/// - Missing or wrong token -> 401 JSON error
/// - No token configured -> 401 (editor routes should not be mounted at all)
pub async fn require_editor_token(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(expected) = state.editor_token() else {
        return unauthorized("Editor is disabled");
    };

    let presented = request
        .headers()
        .get(EDITOR_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());

    match presented {
        Some(token) if bool::from(token.as_bytes().ct_eq(expected.as_bytes())) => {
            next.run(request).await
        }
        Some(_) => {
            tracing::warn!(path = %request.uri().path(), "rejected editor request with wrong token");
            unauthorized("Invalid editor token")
        }
        None => unauthorized("Missing editor token"),
    }
}

fn unauthorized(reason: &'static str) -> Response {
    AppError::Unauthorized(reason).into_response()
}
