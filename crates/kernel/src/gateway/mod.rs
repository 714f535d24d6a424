//! Persistence gateway.
//!
//! The only way documents are read or written. Handlers, the fetch
//! controller, and editing sessions hold an injected `Arc<dyn PageGateway>`;
//! there is no global client. Saves are full-document replaces with no
//! concurrency token, so concurrent writers to one document get
//! last-write-wins.

mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryPageGateway;
pub use postgres::PgPageGateway;

use crate::models::{DocumentKind, PageDocument};

/// Failure talking to the document store.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("a {kind} with slug '{slug}' already exists", kind = .kind.as_str())]
    Conflict { kind: DocumentKind, slug: String },

    #[error("document {0} does not exist")]
    Missing(Uuid),

    #[error("stored document could not be decoded: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("stored document {id} is corrupt: {reason}")]
    Corrupt { id: Uuid, reason: String },

    #[error("{0}")]
    Unavailable(String),
}

/// Storage boundary for page documents.
#[async_trait]
pub trait PageGateway: Send + Sync {
    /// Public read path: matching slug and published.
    async fn find_published_by_slug(
        &self,
        kind: DocumentKind,
        slug: &str,
    ) -> Result<Option<PageDocument>, GatewayError>;

    /// Editor read path: any publish state.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PageDocument>, GatewayError>;

    /// Persist a new document and return its id. `doc.id` is ignored.
    async fn insert(&self, doc: &PageDocument) -> Result<Uuid, GatewayError>;

    /// Replace the stored document `id` with `doc` in full.
    async fn update(&self, id: Uuid, doc: &PageDocument) -> Result<(), GatewayError>;

    /// Delete a document. Deleting a missing document is not an error.
    async fn delete(&self, id: Uuid) -> Result<(), GatewayError>;

    /// Short name of the backing store, for health output and logs.
    fn backend(&self) -> &'static str;

    /// Whether the store is currently reachable.
    async fn check_health(&self) -> bool {
        true
    }
}
