//! In-memory document store.
//!
//! Used when no database is configured and by tests. Enforces the same
//! `(kind, slug)` uniqueness as the PostgreSQL table. Reads go straight to
//! the map; writes are serialized so the slug check and the write are one
//! step.

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use uuid::Uuid;

use super::{GatewayError, PageGateway};
use crate::models::{DocumentKind, PageDocument};

/// [`PageGateway`] holding documents in a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryPageGateway {
    docs: DashMap<Uuid, PageDocument>,
    writes: Mutex<()>,
}

impl MemoryPageGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    fn slug_taken(&self, kind: DocumentKind, slug: &str, except: Option<Uuid>) -> bool {
        self.docs.iter().any(|entry| {
            Some(*entry.key()) != except && entry.kind == kind && entry.slug == slug
        })
    }
}

#[async_trait]
impl PageGateway for MemoryPageGateway {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn find_published_by_slug(
        &self,
        kind: DocumentKind,
        slug: &str,
    ) -> Result<Option<PageDocument>, GatewayError> {
        Ok(self
            .docs
            .iter()
            .find(|entry| entry.kind == kind && entry.slug == slug && entry.is_published)
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PageDocument>, GatewayError> {
        Ok(self.docs.get(&id).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, doc: &PageDocument) -> Result<Uuid, GatewayError> {
        let _writes = self.writes.lock();
        if self.slug_taken(doc.kind, &doc.slug, None) {
            return Err(GatewayError::Conflict {
                kind: doc.kind,
                slug: doc.slug.clone(),
            });
        }

        let id = Uuid::now_v7();
        let now = chrono::Utc::now().timestamp();
        let mut stored = doc.clone();
        stored.id = Some(id);
        stored.created = now;
        stored.changed = now;
        self.docs.insert(id, stored);
        Ok(id)
    }

    async fn update(&self, id: Uuid, doc: &PageDocument) -> Result<(), GatewayError> {
        let _writes = self.writes.lock();
        if self.slug_taken(doc.kind, &doc.slug, Some(id)) {
            return Err(GatewayError::Conflict {
                kind: doc.kind,
                slug: doc.slug.clone(),
            });
        }

        let mut entry = self.docs.get_mut(&id).ok_or(GatewayError::Missing(id))?;
        let created = entry.created;
        let mut stored = doc.clone();
        stored.id = Some(id);
        stored.created = created;
        stored.changed = chrono::Utc::now().timestamp();
        *entry = stored;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), GatewayError> {
        self.docs.remove(&id);
        Ok(())
    }
}
