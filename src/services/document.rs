//! Document library: listing filtered to what the caller may see, and
//! permission-checked deletion.

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::middleware::auth::RequestContext;
use crate::models::document::Document;
use crate::services::access;

/// A visible document plus whether the caller may delete it.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentListing {
    #[serde(flatten)]
    pub document: Document,
    pub can_delete: bool,
}

/// Document columns joined with the uploader's name (`d` ⋈ `u`).
const DOCUMENT_COLUMNS: &str = r#"
    d.id, d.name, COALESCE(d.type, 'unknown') AS type, d.size, d.content_url,
    d.uploaded_by, u.name AS uploaded_by_name,
    d.department, d.departments, d.access_level, d.access_levels,
    COALESCE(d.downloads, 0)::bigint AS downloads,
    COALESCE(d.views, 0)::bigint AS views,
    COALESCE(d.shared, false) AS shared,
    d.created_at
"#;

/// List every document the caller can access, newest first.
pub async fn list_visible(pool: &PgPool, ctx: &RequestContext) -> Result<Vec<DocumentListing>, AppError> {
    let sql = format!(
        r#"
        SELECT {DOCUMENT_COLUMNS}
        FROM documents d
        LEFT JOIN users u ON u.id = d.uploaded_by
        ORDER BY d.created_at DESC
        "#
    );
    let documents = sqlx::query_as::<_, Document>(&sql).fetch_all(pool).await?;

    let total = documents.len();
    let visible = visible_to(ctx, documents);
    tracing::debug!(user_id = %ctx.user_id, total, visible = visible.len(), "Filtered document library");

    Ok(visible)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Document, AppError> {
    let sql = format!(
        r#"
        SELECT {DOCUMENT_COLUMNS}
        FROM documents d
        LEFT JOIN users u ON u.id = d.uploaded_by
        WHERE d.id = $1
        "#
    );

    sqlx::query_as::<_, Document>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Document not found".to_string()))
}

/// Reject callers who may not delete `document`.
pub fn authorize_delete(ctx: &RequestContext, document: &Document) -> Result<(), AppError> {
    if access::can_delete_document(ctx, document) {
        Ok(())
    } else {
        Err(AppError::Forbidden("Insufficient permissions".to_string()))
    }
}

/// Delete a document row. Stored file bytes are left to object storage
/// lifecycle rules.
pub async fn delete(pool: &PgPool, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
    let document = find_by_id(pool, id).await?;
    authorize_delete(ctx, &document)?;

    sqlx::query("DELETE FROM documents WHERE id = $1")
        .bind(document.id)
        .execute(pool)
        .await?;

    tracing::info!(document_id = %id, by = %ctx.user_id, "Document deleted");
    Ok(())
}

/// Drop documents the caller cannot access and flag the deletable ones.
pub fn visible_to(ctx: &RequestContext, documents: Vec<Document>) -> Vec<DocumentListing> {
    documents
        .into_iter()
        .filter(|d| access::can_access_document(ctx, d))
        .map(|document| DocumentListing {
            can_delete: access::can_delete_document(ctx, &document),
            document,
        })
        .collect()
}
