//! Application error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::content::SaveError;
use crate::gateway::GatewayError;
use crate::models::ValidationError;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("not found")]
    NotFound,

    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("document is invalid")]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl From<SaveError> for AppError {
    fn from(e: SaveError) -> Self {
        match e {
            SaveError::Validation(errors) => AppError::Validation(errors),
            SaveError::Gateway(e) => AppError::Gateway(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, "not found").into_response(),
            AppError::Unauthorized(reason) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": reason }))).into_response()
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, format!("bad request: {msg}")).into_response()
            }
            AppError::Validation(errors) => {
                let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "errors": errors, "messages": messages })),
                )
                    .into_response()
            }
            AppError::Gateway(GatewayError::Conflict { kind, slug }) => (
                StatusCode::CONFLICT,
                format!("a {} with slug '{slug}' already exists", kind.as_str()),
            )
                .into_response(),
            AppError::Gateway(GatewayError::Missing(id)) => {
                (StatusCode::NOT_FOUND, format!("document {id} no longer exists")).into_response()
            }
            AppError::Gateway(e) => {
                tracing::error!(error = %e, "page store error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;
