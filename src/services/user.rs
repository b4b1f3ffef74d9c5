use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::middleware::auth::RequestContext;
use crate::models::user::{UpdateUser, UserFilters, UserProfile};
use crate::services::{access, auth as auth_service};

/// Postgres SQLSTATE for foreign key violations.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// User directory ordered by name, optionally narrowed by role name and
/// department.
pub async fn list(pool: &PgPool, filters: &UserFilters) -> Result<Vec<UserProfile>, AppError> {
    let users = sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT u.id, u.name, u.email, u.department, u.position, u.avatar_url,
               u.role_id, r.name AS role_name, r.level AS role_level, u.created_at
        FROM users u
        LEFT JOIN roles r ON r.id = u.role_id
        WHERE ($1::text IS NULL OR r.name = $1)
          AND ($2::text IS NULL OR u.department = $2)
        ORDER BY u.name NULLS LAST
        "#,
    )
    .bind(&filters.role)
    .bind(&filters.department)
    .fetch_all(pool)
    .await?;
    Ok(users)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<UserProfile, AppError> {
    auth_service::find_profile(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Check the caller may apply `input` to user `id`. Role assignment is
/// reserved to administrators, even on one's own profile.
pub fn authorize_update(ctx: &RequestContext, id: Uuid, input: &UpdateUser) -> Result<(), AppError> {
    if !access::can_edit_user(ctx, id) {
        return Err(AppError::Forbidden(
            "You can only update your own profile".to_string(),
        ));
    }
    if input.role_id.is_some() && !access::can_manage_roles(ctx) {
        return Err(AppError::Forbidden(
            "Unauthorized - Admin access required".to_string(),
        ));
    }
    Ok(())
}

/// Update profile fields; absent fields keep their stored values.
pub async fn update(
    pool: &PgPool,
    ctx: &RequestContext,
    id: Uuid,
    input: &UpdateUser,
) -> Result<UserProfile, AppError> {
    authorize_update(ctx, id, input)?;
    let existing = find_by_id(pool, id).await?;

    sqlx::query(
        r#"
        UPDATE users SET
            name = COALESCE($2, name),
            role_id = COALESCE($3, role_id),
            department = COALESCE($4, department),
            position = COALESCE($5, position)
        WHERE id = $1
        "#,
    )
    .bind(existing.id)
    .bind(input.name.as_deref().map(str::trim))
    .bind(input.role_id)
    .bind(&input.department)
    .bind(&input.position)
    .execute(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) => {
            AppError::Validation("Unknown role".to_string())
        }
        _ => AppError::Database(e),
    })?;

    if input.role_id.is_some() && input.role_id != existing.role_id {
        tracing::info!(
            user_id = %id,
            role_id = ?input.role_id,
            by = %ctx.user_id,
            "User role changed"
        );
    }

    find_by_id(pool, id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(level: i32) -> RequestContext {
        RequestContext {
            user_id: Uuid::new_v4(),
            email: None,
            name: None,
            department: Some("IT".to_string()),
            role_name: None,
            role_level: Some(level),
        }
    }

    fn rename() -> UpdateUser {
        UpdateUser {
            name: Some("Dana Reyes".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn user_may_edit_own_profile() {
        let officer = ctx(4);
        assert!(authorize_update(&officer, officer.user_id, &rename()).is_ok());
    }

    #[test]
    fn user_may_not_edit_colleague() {
        let result = authorize_update(&ctx(2), Uuid::new_v4(), &rename());
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn administrator_may_edit_anyone() {
        let input = UpdateUser {
            role_id: Some(Uuid::new_v4()),
            ..rename()
        };
        assert!(authorize_update(&ctx(1), Uuid::new_v4(), &input).is_ok());
    }

    #[test]
    fn self_role_assignment_needs_administrator() {
        let vp = ctx(3);
        let input = UpdateUser {
            role_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        let result = authorize_update(&vp, vp.user_id, &input);
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
