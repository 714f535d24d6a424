//! Page document model.
//!
//! A page document is metadata plus an ordered block sequence. Pages and blog
//! posts share the model and are told apart by [`DocumentKind`]; slugs are
//! unique per kind.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::content::{BlockCollection, BlockId};
use crate::services::slug::slugify;
use crate::theme::Layout;

/// What kind of document this is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    #[default]
    Page,
    Post,
}

impl DocumentKind {
    /// Return the string representation stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Post => "post",
        }
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "page" => Ok(Self::Page),
            "post" => Ok(Self::Post),
            _ => Err(anyhow::anyhow!(
                "invalid document kind: {s:?} (expected page or post)"
            )),
        }
    }
}

/// A reason a document cannot be saved.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,

    #[error("slug is empty; enter a slug or a title containing letters or digits")]
    EmptySlug,

    #[error("block id '{id}' is used more than once")]
    DuplicateBlockId { id: BlockId },
}

/// The top-level authored entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageDocument {
    /// Absent until the document is first persisted.
    pub id: Option<Uuid>,

    pub kind: DocumentKind,

    pub title: String,

    /// URL path segment. Derived from `title` at save time when blank.
    pub slug: String,

    /// SEO description.
    pub description: Option<String>,

    /// SEO keywords.
    pub keywords: Option<String>,

    pub layout: Layout,

    /// Visible on the public read path.
    pub is_published: bool,

    /// Rendering order is sequence order.
    pub blocks: BlockCollection,

    /// Unix timestamp when first inserted.
    pub created: i64,

    /// Unix timestamp of the last write.
    pub changed: i64,
}

impl PageDocument {
    /// An empty, unpublished document.
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// The slug this document would be saved under.
    pub fn effective_slug(&self) -> String {
        if self.slug.trim().is_empty() {
            slugify(self.title.trim())
        } else {
            self.slug.trim().to_string()
        }
    }

    /// Check everything a save requires.
    ///
    /// Returns the effective slug on success and every problem found
    /// otherwise. Never modifies the document.
    pub fn validate(&self) -> Result<String, Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push(ValidationError::MissingTitle);
        }

        let slug = self.effective_slug();
        // A missing title already explains an empty derived slug.
        if slug.is_empty() && !errors.contains(&ValidationError::MissingTitle) {
            errors.push(ValidationError::EmptySlug);
        }

        errors.extend(
            self.blocks
                .duplicate_ids()
                .into_iter()
                .map(|id| ValidationError::DuplicateBlockId { id }),
        );

        if errors.is_empty() {
            Ok(slug)
        } else {
            Err(errors)
        }
    }
}
