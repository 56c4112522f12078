//! Administrative commands run outside the HTTP server.

pub mod seeder;

use sqlx::PgPool;
use validator::Validate;

use crate::modules::users::model::{CreateUserDto, User, UserRole};
use crate::modules::users::service::UserService;

/// Creates an active admin account. The API has no unauthenticated way to do
/// this, so the first admin comes from here.
pub async fn create_admin(db: &PgPool, username: &str, password: &str) -> anyhow::Result<User> {
    let dto = CreateUserDto {
        username: username.trim().to_string(),
        password: password.to_string(),
        role: UserRole::Admin,
        is_active: true,
    };
    dto.validate()?;

    let user = UserService::create_user(db, dto).await.map_err(|e| e.error)?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_admin(pool: PgPool) {
        let user = create_admin(&pool, " principal ", "password123").await.unwrap();
        assert_eq!(user.username, "principal");
        assert_eq!(user.role, UserRole::Admin);
        assert!(user.is_active);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_admin_rejects_duplicates_and_short_passwords(pool: PgPool) {
        create_admin(&pool, "principal", "password123").await.unwrap();

        let duplicate = create_admin(&pool, "principal", "password456").await;
        assert!(duplicate.unwrap_err().to_string().contains("already taken"));

        assert!(create_admin(&pool, "deputy", "short").await.is_err());
    }
}
