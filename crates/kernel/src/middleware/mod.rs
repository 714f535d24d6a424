//! HTTP middleware components.
//!
//! Provides request authentication for the editor API.

pub mod editor_token;

pub use editor_token::{EDITOR_TOKEN_HEADER, require_editor_token};
