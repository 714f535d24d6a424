//! Editing session.
//!
//! Holds the working copy of one document while it is being edited. Block
//! mutations go through [`BlockCollection`]; metadata through the setters.
//! Nothing reaches storage until [`EditingSession::save`].

use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use super::collection::BlockCollection;
use crate::gateway::{GatewayError, PageGateway};
use crate::models::{DocumentKind, PageDocument, ValidationError};
use crate::theme::Layout;

/// Why a save did not happen.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("document is invalid")]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Working copy of one document.
#[derive(Debug, Clone)]
pub struct EditingSession {
    document: PageDocument,
}

impl EditingSession {
    /// Start a session for a new, unsaved document.
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            document: PageDocument::new(kind),
        }
    }

    /// Start a session over an already-loaded document.
    pub fn open(document: PageDocument) -> Self {
        Self { document }
    }

    /// Load document `id` for editing, whatever its publish state.
    pub async fn load(gateway: &dyn PageGateway, id: Uuid) -> Result<Option<Self>, GatewayError> {
        Ok(gateway.find_by_id(id).await?.map(Self::open))
    }

    pub fn document(&self) -> &PageDocument {
        &self.document
    }

    pub fn into_document(self) -> PageDocument {
        self.document
    }

    pub fn id(&self) -> Option<Uuid> {
        self.document.id
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.document.title = title.into();
    }

    /// Set an explicit slug. A blank slug is derived from the title on save.
    pub fn set_slug(&mut self, slug: impl Into<String>) {
        self.document.slug = slug.into();
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.document.description = description.filter(|d| !d.trim().is_empty());
    }

    pub fn set_keywords(&mut self, keywords: Option<String>) {
        self.document.keywords = keywords.filter(|k| !k.trim().is_empty());
    }

    pub fn set_layout(&mut self, layout: Layout) {
        self.document.layout = layout;
    }

    pub fn set_published(&mut self, published: bool) {
        self.document.is_published = published;
    }

    pub fn blocks(&self) -> &BlockCollection {
        &self.document.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut BlockCollection {
        &mut self.document.blocks
    }

    /// Persist the working copy.
    ///
    /// Inserts when the document has no id yet, otherwise overwrites the
    /// stored record (last write wins). On success the session takes the
    /// assigned id and the effective slug. On failure the working copy is
    /// left exactly as it was.
    pub async fn save(&mut self, gateway: &dyn PageGateway) -> Result<Uuid, SaveError> {
        let slug = self.document.validate().map_err(SaveError::Validation)?;
        let sent_slug = self.document.slug.clone();

        let mut outgoing = self.document.clone();
        outgoing.slug = slug;

        let id = match outgoing.id {
            None => {
                let id = gateway.insert(&outgoing).await?;
                info!(id = %id, kind = outgoing.kind.as_str(), slug = %outgoing.slug, "document created");
                id
            }
            Some(id) => {
                gateway.update(id, &outgoing).await?;
                debug!(id = %id, slug = %outgoing.slug, "document saved");
                id
            }
        };

        self.mark_saved(id, &sent_slug, outgoing.slug);
        Ok(id)
    }

    /// Record the outcome of a save made from a snapshot of this session.
    ///
    /// `sent_slug` is the slug the snapshot carried. The effective slug only
    /// replaces it while the session still holds it; a slug edited while the
    /// save was in flight is kept.
    pub fn mark_saved(&mut self, id: Uuid, sent_slug: &str, saved_slug: String) {
        self.document.id = Some(id);
        if self.document.slug == sent_slug {
            self.document.slug = saved_slug;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::content::BlockType;
    use crate::gateway::MemoryPageGateway;

    #[tokio::test]
    async fn save_inserts_then_updates() {
        let gateway = MemoryPageGateway::new();
        let mut session = EditingSession::new(DocumentKind::Page);
        session.set_title("About Us");
        session.blocks_mut().add_block(BlockType::Paragraph);

        let id = session.save(&gateway).await.unwrap();
        assert_eq!(session.id(), Some(id));
        assert_eq!(session.document().slug, "about-us");

        session.set_title("About the Team");
        assert_eq!(session.save(&gateway).await.unwrap(), id);
        assert_eq!(gateway.len(), 1);

        let stored = gateway.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.title, "About the Team");
        // An explicit slug sticks once assigned.
        assert_eq!(stored.slug, "about-us");
        assert_eq!(stored.blocks.len(), 1);
    }

    #[tokio::test]
    async fn invalid_document_is_left_untouched() {
        let gateway = MemoryPageGateway::new();
        let mut session = EditingSession::new(DocumentKind::Page);
        session.blocks_mut().add_block(BlockType::Heading);
        let before = session.document().clone();

        let err = session.save(&gateway).await.unwrap_err();
        assert!(matches!(err, SaveError::Validation(ref e) if e == &[ValidationError::MissingTitle]));
        assert_eq!(session.document(), &before);
        assert!(gateway.is_empty());
    }

    #[tokio::test]
    async fn blank_metadata_is_stored_as_absent() {
        let mut session = EditingSession::new(DocumentKind::Post);
        session.set_description(Some("  ".to_string()));
        session.set_keywords(Some("rust, cms".to_string()));
        assert_eq!(session.document().description, None);
        assert_eq!(session.document().keywords.as_deref(), Some("rust, cms"));
    }
}
