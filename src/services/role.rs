//! Role administration.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::role::{CreateRole, Role, UpdateRole};

/// Postgres SQLSTATE for unique violations.
const UNIQUE_VIOLATION: &str = "23505";

/// All roles, most privileged first.
pub async fn list(pool: &PgPool) -> Result<Vec<Role>, AppError> {
    let roles = sqlx::query_as::<_, Role>(
        "SELECT id, name, level, description, created_at, updated_at FROM roles ORDER BY level, name",
    )
    .fetch_all(pool)
    .await?;
    Ok(roles)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Role, AppError> {
    sqlx::query_as::<_, Role>(
        "SELECT id, name, level, description, created_at, updated_at FROM roles WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Role not found".to_string()))
}

pub async fn create(pool: &PgPool, input: &CreateRole) -> Result<Role, AppError> {
    let role = sqlx::query_as::<_, Role>(
        r#"
        INSERT INTO roles (name, level, description)
        VALUES ($1, $2, $3)
        RETURNING id, name, level, description, created_at, updated_at
        "#,
    )
    .bind(input.name.trim())
    .bind(input.level)
    .bind(&input.description)
    .fetch_one(pool)
    .await
    .map_err(|e| conflict_on_duplicate(e, &input.name))?;

    tracing::info!(role_id = %role.id, name = %role.name, level = role.level, "Role created");
    Ok(role)
}

/// Update role fields; absent fields keep their stored values.
pub async fn update(pool: &PgPool, id: Uuid, input: &UpdateRole) -> Result<Role, AppError> {
    let existing = find_by_id(pool, id).await?;

    let role = sqlx::query_as::<_, Role>(
        r#"
        UPDATE roles SET
            name = COALESCE($2, name),
            level = COALESCE($3, level),
            description = COALESCE($4, description),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, level, description, created_at, updated_at
        "#,
    )
    .bind(existing.id)
    .bind(input.name.as_deref().map(str::trim))
    .bind(input.level)
    .bind(&input.description)
    .fetch_one(pool)
    .await
    .map_err(|e| conflict_on_duplicate(e, input.name.as_deref().unwrap_or(&existing.name)))?;

    Ok(role)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM roles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Role not found".to_string()));
    }
    tracing::info!(role_id = %id, "Role deleted");
    Ok(())
}

fn conflict_on_duplicate(err: sqlx::Error, name: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            AppError::Conflict(format!("Role '{}' already exists", name.trim()))
        }
        _ => AppError::Database(err),
    }
}
