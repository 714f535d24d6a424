//! Folio Kernel Library
//!
//! Content block document model, page rendering, and the HTTP surface over
//! them. The main entry point for running the server is the `folio` binary.

pub mod config;
pub mod content;
pub mod error;
pub mod fetch;
pub mod gateway;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod theme;
