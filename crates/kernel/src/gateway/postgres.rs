//! PostgreSQL document store.
//!
//! Blocks live in a JSONB column as the ordered `{id, type, content}` array;
//! the database never looks inside it. The table is created by an explicit
//! [`PgPageGateway::ensure_schema`] call at startup.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{debug, info};
use uuid::Uuid;

use super::{GatewayError, PageGateway};
use crate::content::BlockCollection;
use crate::models::{DocumentKind, PageDocument};
use crate::theme::Layout;

const COLUMNS: &str = "id, kind, title, slug, description, keywords, layout, is_published, blocks, created, changed";

/// Row shape of the `page_document` table.
#[derive(sqlx::FromRow)]
struct PageRow {
    id: Uuid,
    kind: String,
    title: String,
    slug: String,
    description: Option<String>,
    keywords: Option<String>,
    layout: String,
    is_published: bool,
    blocks: serde_json::Value,
    created: i64,
    changed: i64,
}

impl TryFrom<PageRow> for PageDocument {
    type Error = GatewayError;

    fn try_from(row: PageRow) -> Result<Self, Self::Error> {
        let kind = row
            .kind
            .parse::<DocumentKind>()
            .map_err(|e| GatewayError::Corrupt {
                id: row.id,
                reason: e.to_string(),
            })?;
        let blocks: BlockCollection = serde_json::from_value(row.blocks)?;
        Ok(PageDocument {
            id: Some(row.id),
            kind,
            title: row.title,
            slug: row.slug,
            description: row.description,
            keywords: row.keywords,
            layout: Layout::from_key(&row.layout),
            is_published: row.is_published,
            blocks,
            created: row.created,
            changed: row.changed,
        })
    }
}

/// Map a unique-constraint violation on `(kind, slug)` to a conflict.
fn map_write_error(err: sqlx::Error, doc: &PageDocument) -> GatewayError {
    if let sqlx::Error::Database(db) = &err
        && db.is_unique_violation()
    {
        return GatewayError::Conflict {
            kind: doc.kind,
            slug: doc.slug.clone(),
        };
    }
    GatewayError::Database(err)
}

/// [`PageGateway`] backed by PostgreSQL.
#[derive(Clone)]
pub struct PgPageGateway {
    pool: PgPool,
}

impl PgPageGateway {
    /// Wrap an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, GatewayError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Create the document table if it does not exist.
    pub async fn ensure_schema(&self) -> Result<(), GatewayError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS page_document (
                id UUID PRIMARY KEY,
                kind TEXT NOT NULL DEFAULT 'page',
                title TEXT NOT NULL,
                slug TEXT NOT NULL,
                description TEXT,
                keywords TEXT,
                layout TEXT NOT NULL DEFAULT 'default',
                is_published BOOLEAN NOT NULL DEFAULT FALSE,
                blocks JSONB NOT NULL DEFAULT '[]'::jsonb,
                created BIGINT NOT NULL,
                changed BIGINT NOT NULL,
                UNIQUE (kind, slug)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("page_document schema ready");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl PageGateway for PgPageGateway {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn check_health(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    async fn find_published_by_slug(
        &self,
        kind: DocumentKind,
        slug: &str,
    ) -> Result<Option<PageDocument>, GatewayError> {
        let row = sqlx::query_as::<_, PageRow>(&format!(
            "SELECT {COLUMNS} FROM page_document WHERE kind = $1 AND slug = $2 AND is_published = TRUE"
        ))
        .bind(kind.as_str())
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        row.map(PageDocument::try_from).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PageDocument>, GatewayError> {
        let row = sqlx::query_as::<_, PageRow>(&format!(
            "SELECT {COLUMNS} FROM page_document WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(PageDocument::try_from).transpose()
    }

    async fn insert(&self, doc: &PageDocument) -> Result<Uuid, GatewayError> {
        let id = Uuid::now_v7();
        let now = chrono::Utc::now().timestamp();
        let blocks = serde_json::to_value(&doc.blocks)?;

        sqlx::query(&format!(
            "INSERT INTO page_document ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"
        ))
        .bind(id)
        .bind(doc.kind.as_str())
        .bind(&doc.title)
        .bind(&doc.slug)
        .bind(&doc.description)
        .bind(&doc.keywords)
        .bind(doc.layout.as_str())
        .bind(doc.is_published)
        .bind(blocks)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, doc))?;

        debug!(page_id = %id, "page document inserted");
        Ok(id)
    }

    async fn update(&self, id: Uuid, doc: &PageDocument) -> Result<(), GatewayError> {
        let now = chrono::Utc::now().timestamp();
        let blocks = serde_json::to_value(&doc.blocks)?;

        let result = sqlx::query(
            r#"
            UPDATE page_document
            SET kind = $2, title = $3, slug = $4, description = $5, keywords = $6,
                layout = $7, is_published = $8, blocks = $9, changed = $10
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(doc.kind.as_str())
        .bind(&doc.title)
        .bind(&doc.slug)
        .bind(&doc.description)
        .bind(&doc.keywords)
        .bind(doc.layout.as_str())
        .bind(doc.is_published)
        .bind(blocks)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, doc))?;

        if result.rows_affected() == 0 {
            return Err(GatewayError::Missing(id));
        }

        debug!(page_id = %id, "page document replaced");
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), GatewayError> {
        sqlx::query("DELETE FROM page_document WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(page_id = %id, "page document deleted");
        Ok(())
    }
}
