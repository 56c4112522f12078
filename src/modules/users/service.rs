use anyhow::anyhow;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument};

use edutrack_core::{AppError, PaginationMeta, hash_password};
use edutrack_models::ids::UserId;
use edutrack_observability::track_user_created;

use crate::modules::parents::model::Parent;
use crate::modules::parents::service::PARENT_COLUMNS;
use crate::modules::teachers::model::Teacher;
use crate::modules::teachers::service::TEACHER_COLUMNS;
use crate::modules::users::model::{
    CreateUserDto, PaginatedUsersResponse, UpdateUserDto, User, UserDetail, UserFilterParams,
    UserRole,
};
use crate::utils::query::search_term;
use crate::utils::references::count_references;

pub(crate) const USER_COLUMNS: &str =
    "id, username, role, is_active, last_login_at, created_at, updated_at";

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &UserFilterParams) {
    builder.push(" WHERE TRUE");
    if let Some(role) = filters.role {
        builder.push(" AND role = ").push_bind(role);
    }
    if let Some(is_active) = filters.is_active {
        builder.push(" AND is_active = ").push_bind(is_active);
    }
    if let Some(pattern) = search_term(&filters.search) {
        builder.push(" AND username ILIKE ").push_bind(pattern);
    }
}

fn map_unique_username(e: sqlx::Error, username: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::conflict(anyhow!("Username '{}' is already taken", username))
        }
        _ => AppError::from(e),
    }
}

pub struct UserService;

impl UserService {
    #[instrument(skip(dto), fields(username = %dto.username, role = %dto.role))]
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<User, AppError> {
        let username = dto.username.trim();
        let password_hash = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"INSERT INTO users (username, password_hash, role, is_active)
               VALUES ($1, $2, $3, $4)
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(username)
        .bind(&password_hash)
        .bind(dto.role)
        .bind(dto.is_active)
        .fetch_one(db)
        .await
        .map_err(|e| map_unique_username(e, username))?;

        track_user_created(user.role.as_str());
        info!(user_id = %user.id, "User created");

        Ok(user)
    }

    #[instrument]
    pub async fn get_users(
        db: &PgPool,
        filters: UserFilterParams,
    ) -> Result<PaginatedUsersResponse, AppError> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM users");
        push_filters(&mut count_query, &filters);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(db)
            .await?;

        let mut data_query = QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users"));
        push_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY id ASC LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.skip());
        let users = data_query.build_query_as::<User>().fetch_all(db).await?;

        Ok(PaginatedUsersResponse {
            data: users,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument]
    pub async fn get_user_by_id(db: &PgPool, id: UserId) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User {} not found", id)))
    }

    #[instrument]
    pub async fn get_user_detail(db: &PgPool, id: UserId) -> Result<UserDetail, AppError> {
        let user = Self::get_user_by_id(db, id).await?;

        let teacher_profile = sqlx::query_as::<_, Teacher>(&format!(
            "SELECT {TEACHER_COLUMNS} FROM teachers WHERE user_id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;

        let parent_profile = sqlx::query_as::<_, Parent>(&format!(
            "SELECT {PARENT_COLUMNS} FROM parents WHERE user_id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(UserDetail {
            user,
            teacher_profile,
            parent_profile,
        })
    }

    /// A role change is refused while a profile of the old role is still
    /// linked to the account.
    #[instrument(skip(dto))]
    pub async fn update_user(
        db: &PgPool,
        id: UserId,
        dto: UpdateUserDto,
    ) -> Result<User, AppError> {
        let existing = Self::get_user_by_id(db, id).await?;

        if let Some(role) = dto.role.filter(|r| *r != existing.role) {
            let profile_table = match existing.role {
                UserRole::Teacher => Some("teachers"),
                UserRole::Parent => Some("parents"),
                UserRole::Admin => None,
            };
            if let Some(table) = profile_table {
                let linked = count_references(db, table, "user_id", id.into_inner()).await?;
                if linked > 0 {
                    return Err(AppError::conflict(anyhow!(
                        "User {} is linked to a {} profile; unlink it before changing the role to {}",
                        id,
                        existing.role,
                        role
                    )));
                }
            }
        }

        let username = dto
            .username
            .map(|u| u.trim().to_string())
            .unwrap_or(existing.username);
        let role = dto.role.unwrap_or(existing.role);
        let is_active = dto.is_active.unwrap_or(existing.is_active);
        let password_hash = dto.password.as_deref().map(hash_password).transpose()?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"UPDATE users
               SET username = $1, role = $2, is_active = $3,
                   password_hash = COALESCE($4, password_hash), updated_at = NOW()
               WHERE id = $5
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(&username)
        .bind(role)
        .bind(is_active)
        .bind(password_hash)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(|e| map_unique_username(e, &username))?;

        Ok(user)
    }

    /// Linked profiles are kept and unlinked; the user's notifications are
    /// removed.
    #[instrument]
    pub async fn delete_user(db: &PgPool, id: UserId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("User {} not found", id)));
        }
        Ok(())
    }
}
