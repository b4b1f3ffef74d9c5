//! Announcement board: feed, publish, edit and delete.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::middleware::auth::RequestContext;
use crate::models::announcement::{
    Announcement, AnnouncementFilters, CreateAnnouncement, UpdateAnnouncement,
};
use crate::services::access;

/// Announcement columns joined with the author's profile (`a` ⋈ `u`).
const ANNOUNCEMENT_COLUMNS: &str = r#"
    a.id, a.title, COALESCE(a.content, '') AS content, a.user_id, a.author,
    a.department, a.departments,
    COALESCE(a.priority, 'medium') AS priority,
    COALESCE(a.pinned, false) AS pinned,
    COALESCE(a.views, 0)::int AS views,
    COALESCE(a.likes, 0)::int AS likes,
    COALESCE(a.comments, 0)::int AS comments,
    COALESCE(a.tags, '{}') AS tags,
    a.created_at, a.updated_at,
    COALESCE(u.name, a.author, 'Unknown User') AS author_name,
    u.avatar_url AS author_avatar
"#;

/// Department filter value meaning "no filter".
const ANY_DEPARTMENT: &str = "all";

/// List announcements, pinned first then newest first, optionally narrowed
/// to those targeting a department.
pub async fn list(pool: &PgPool, filters: &AnnouncementFilters) -> Result<Vec<Announcement>, AppError> {
    let sql = format!(
        r#"
        SELECT {ANNOUNCEMENT_COLUMNS}
        FROM announcements a
        LEFT JOIN users u ON u.id = a.user_id
        WHERE ($1::text IS NULL OR a.priority = $1)
        ORDER BY COALESCE(a.pinned, false) DESC, a.created_at DESC
        "#
    );

    let rows = sqlx::query_as::<_, Announcement>(&sql)
        .bind(filters.priority.map(|p| p.as_str()))
        .fetch_all(pool)
        .await?;

    Ok(filter_by_department(rows, filters.department.as_deref()))
}

/// Keep announcements that reach `department`; `None` or "all" keeps everything.
pub fn filter_by_department(rows: Vec<Announcement>, department: Option<&str>) -> Vec<Announcement> {
    match department {
        None => rows,
        Some(d) if d.eq_ignore_ascii_case(ANY_DEPARTMENT) => rows,
        Some(d) => rows
            .into_iter()
            .filter(|a| {
                access::targets_department(a.departments.as_deref(), a.department.as_deref(), Some(d))
            })
            .collect(),
    }
}

/// Find an announcement by ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Announcement, AppError> {
    let sql = format!(
        r#"
        SELECT {ANNOUNCEMENT_COLUMNS}
        FROM announcements a
        LEFT JOIN users u ON u.id = a.user_id
        WHERE a.id = $1
        "#
    );

    sqlx::query_as::<_, Announcement>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))
}

/// Publish an announcement authored by the caller.
pub async fn create(
    pool: &PgPool,
    author: &RequestContext,
    input: &CreateAnnouncement,
) -> Result<Announcement, AppError> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }

    let departments = access::normalize_targets(input.departments.clone(), input.department.clone());
    let legacy = access::legacy_department(&departments);
    let author_label = author
        .email
        .clone()
        .unwrap_or_else(|| "Unknown User".to_string());

    let sql = format!(
        r#"
        WITH a AS (
            INSERT INTO announcements (
                title, content, user_id, author, department, departments,
                priority, pinned, views, likes, comments, tags
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 0, 0, 0, $9)
            RETURNING *
        )
        SELECT {ANNOUNCEMENT_COLUMNS}
        FROM a
        LEFT JOIN users u ON u.id = a.user_id
        "#
    );

    let announcement = sqlx::query_as::<_, Announcement>(&sql)
        .bind(title)
        .bind(&input.content)
        .bind(author.user_id)
        .bind(&author_label)
        .bind(&legacy)
        .bind(&departments)
        .bind(input.priority.as_str())
        .bind(input.pinned)
        .bind(&input.tags)
        .fetch_one(pool)
        .await?;

    tracing::info!(
        announcement_id = %announcement.id,
        author = %author.user_id,
        departments = ?departments,
        "Announcement published"
    );

    Ok(announcement)
}

/// Update announcement fields. Changing `departments` also rewrites the
/// legacy single-department column.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: &UpdateAnnouncement,
) -> Result<Announcement, AppError> {
    let existing = find_by_id(pool, id).await?;

    let legacy = input
        .departments
        .as_deref()
        .map(access::legacy_department);
    let title = input.title.as_deref().map(str::trim);
    if title == Some("") {
        return Err(AppError::Validation("title cannot be blank".to_string()));
    }

    let sql = format!(
        r#"
        WITH a AS (
            UPDATE announcements SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                departments = COALESCE($4, departments),
                department = COALESCE($5, department),
                priority = COALESCE($6, priority),
                pinned = COALESCE($7, pinned),
                tags = COALESCE($8, tags),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
        )
        SELECT {ANNOUNCEMENT_COLUMNS}
        FROM a
        LEFT JOIN users u ON u.id = a.user_id
        "#
    );

    let announcement = sqlx::query_as::<_, Announcement>(&sql)
        .bind(existing.id)
        .bind(title)
        .bind(&input.content)
        .bind(&input.departments)
        .bind(&legacy)
        .bind(input.priority.map(|p| p.as_str()))
        .bind(input.pinned)
        .bind(&input.tags)
        .fetch_one(pool)
        .await?;

    Ok(announcement)
}

/// Delete an announcement.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let deleted = sqlx::query_scalar::<_, Uuid>("DELETE FROM announcements WHERE id = $1 RETURNING id")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match deleted {
        Some(_) => {
            tracing::info!(announcement_id = %id, "Announcement deleted");
            Ok(())
        }
        None => Err(AppError::NotFound("Announcement not found".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn announcement(title: &str, departments: Option<&[&str]>, legacy: Option<&str>) -> Announcement {
        Announcement {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: String::new(),
            user_id: None,
            author: None,
            department: legacy.map(str::to_string),
            departments: departments.map(|d| d.iter().map(|s| s.to_string()).collect()),
            priority: "medium".to_string(),
            pinned: false,
            views: 0,
            likes: 0,
            comments: 0,
            tags: vec![],
            created_at: Utc::now(),
            updated_at: None,
            author_name: "Unknown User".to_string(),
            author_avatar: None,
        }
    }

    fn board() -> Vec<Announcement> {
        vec![
            announcement("company-wide", Some(&["All"]), Some("All")),
            announcement("finance-only", Some(&["Finance"]), Some("Finance")),
            announcement("legacy-it", None, Some("IT")),
            announcement("legacy-all", None, Some("All")),
        ]
    }

    fn titles(rows: &[Announcement]) -> Vec<&str> {
        rows.iter().map(|a| a.title.as_str()).collect()
    }

    #[test]
    fn no_filter_keeps_everything() {
        assert_eq!(filter_by_department(board(), None).len(), 4);
        assert_eq!(filter_by_department(board(), Some("all")).len(), 4);
    }

    #[test]
    fn department_filter_honours_wildcard_and_legacy() {
        let it = filter_by_department(board(), Some("IT"));
        assert_eq!(titles(&it), vec!["company-wide", "legacy-it", "legacy-all"]);

        let finance = filter_by_department(board(), Some("Finance"));
        assert_eq!(titles(&finance), vec!["company-wide", "finance-only", "legacy-all"]);
    }
}
