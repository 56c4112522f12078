//! Foreign-key checks run before writes.
//!
//! The schema enforces every reference, but a database violation cannot say
//! which request field was wrong. These checks fail first with a 422 naming
//! the field, or a 409 describing the rows that block a delete.

use anyhow::anyhow;
use sqlx::PgExecutor;

use edutrack_core::AppError;
use edutrack_models::users::UserRole;

/// Tables that other rows point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    User,
    Parent,
    Teacher,
    Level,
    Classroom,
    Student,
    Subject,
}

impl Reference {
    pub fn table(&self) -> &'static str {
        match self {
            Reference::User => "users",
            Reference::Parent => "parents",
            Reference::Teacher => "teachers",
            Reference::Level => "levels",
            Reference::Classroom => "classrooms",
            Reference::Student => "students",
            Reference::Subject => "subjects",
        }
    }

    pub fn entity(&self) -> &'static str {
        match self {
            Reference::User => "User",
            Reference::Parent => "Parent",
            Reference::Teacher => "Teacher",
            Reference::Level => "Level",
            Reference::Classroom => "Classroom",
            Reference::Student => "Student",
            Reference::Subject => "Subject",
        }
    }
}

/// Fails with 422 `field: Entity id does not exist` when the row is missing.
pub async fn ensure_exists<'c>(
    executor: impl PgExecutor<'c>,
    reference: Reference,
    id: i64,
    field: &str,
) -> Result<(), AppError> {
    let exists = sqlx::query_scalar::<_, bool>(&format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
        reference.table()
    ))
    .bind(id)
    .fetch_one(executor)
    .await?;

    if !exists {
        return Err(AppError::missing_reference(field, reference.entity(), id));
    }
    Ok(())
}

/// A profile may only be linked to a user holding the matching role.
pub async fn ensure_user_with_role<'c>(
    executor: impl PgExecutor<'c>,
    user_id: i64,
    expected: UserRole,
) -> Result<(), AppError> {
    let role = sqlx::query_scalar::<_, UserRole>("SELECT role FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::missing_reference("user_id", "User", user_id))?;

    if role != expected {
        return Err(AppError::unprocessable(anyhow!(
            "user_id: User {} has role {}, expected {}",
            user_id,
            role,
            expected
        )));
    }
    Ok(())
}

/// Counts rows of `table` whose `column` points at `id`.
///
/// Both names come from this crate, never from request input.
pub async fn count_references<'c>(
    executor: impl PgExecutor<'c>,
    table: &'static str,
    column: &'static str,
    id: i64,
) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>(&format!(
        "SELECT COUNT(*) FROM {} WHERE {} = $1",
        table, column
    ))
    .bind(id)
    .fetch_one(executor)
    .await?;
    Ok(count)
}

/// 409 for a delete blocked by dependent rows.
pub fn restrict_violation(entity: &str, id: i64, count: i64, dependents: &str) -> AppError {
    AppError::conflict(anyhow!(
        "Cannot delete {} {}: {} {} still reference it",
        entity,
        id,
        count,
        dependents
    ))
}
