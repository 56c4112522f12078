use anyhow::anyhow;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use edutrack_core::{AppError, PaginationMeta};
use edutrack_models::ids::ParentId;
use edutrack_models::users::UserRole;

use crate::modules::parents::model::{
    CreateParentDto, PaginatedParentsResponse, Parent, ParentDetail, ParentFilterParams,
    UpdateParentDto,
};
use crate::modules::students::model::Student;
use crate::modules::students::service::STUDENT_COLUMNS;
use crate::utils::query::search_term;
use crate::utils::references::{count_references, ensure_user_with_role, restrict_violation};

pub(crate) const PARENT_COLUMNS: &str =
    "id, first_name, last_name, email, phone, address, user_id, created_at, updated_at";

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &ParentFilterParams) {
    builder.push(" WHERE TRUE");
    if let Some(pattern) = search_term(&filters.search) {
        builder
            .push(" AND (first_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR last_name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(user_id) = filters.user_id {
        builder.push(" AND user_id = ").push_bind(user_id);
    }
}

fn map_unique(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            match db_err.constraint() {
                Some("parents_user_id_key") => AppError::conflict(anyhow!(
                    "This user account is already linked to another parent"
                )),
                _ => AppError::conflict(anyhow!("A parent with this email already exists")),
            }
        }
        _ => AppError::from(e),
    }
}

pub struct ParentService;

impl ParentService {
    #[instrument]
    pub async fn create_parent(db: &PgPool, dto: CreateParentDto) -> Result<Parent, AppError> {
        if let Some(user_id) = dto.user_id {
            ensure_user_with_role(db, user_id.into_inner(), UserRole::Parent).await?;
        }

        let parent = sqlx::query_as::<_, Parent>(&format!(
            r#"INSERT INTO parents (first_name, last_name, email, phone, address, user_id)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {PARENT_COLUMNS}"#
        ))
        .bind(dto.first_name.trim())
        .bind(dto.last_name.trim())
        .bind(&dto.email)
        .bind(&dto.phone)
        .bind(&dto.address)
        .bind(dto.user_id)
        .fetch_one(db)
        .await
        .map_err(map_unique)?;

        Ok(parent)
    }

    #[instrument]
    pub async fn get_parents(
        db: &PgPool,
        filters: ParentFilterParams,
    ) -> Result<PaginatedParentsResponse, AppError> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM parents");
        push_filters(&mut count_query, &filters);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(db)
            .await?;

        let mut data_query = QueryBuilder::new(format!("SELECT {PARENT_COLUMNS} FROM parents"));
        push_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY id ASC LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.skip());
        let parents = data_query.build_query_as::<Parent>().fetch_all(db).await?;

        Ok(PaginatedParentsResponse {
            data: parents,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument]
    pub async fn get_parent_by_id(db: &PgPool, id: ParentId) -> Result<Parent, AppError> {
        sqlx::query_as::<_, Parent>(&format!(
            "SELECT {PARENT_COLUMNS} FROM parents WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Parent {} not found", id)))
    }

    #[instrument]
    pub async fn get_parent_detail(db: &PgPool, id: ParentId) -> Result<ParentDetail, AppError> {
        let parent = Self::get_parent_by_id(db, id).await?;

        let students = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE parent_id = $1 ORDER BY id"
        ))
        .bind(id)
        .fetch_all(db)
        .await?;

        Ok(ParentDetail { parent, students })
    }

    #[instrument]
    pub async fn update_parent(
        db: &PgPool,
        id: ParentId,
        dto: UpdateParentDto,
    ) -> Result<Parent, AppError> {
        let existing = Self::get_parent_by_id(db, id).await?;

        if let Some(Some(user_id)) = dto.user_id {
            ensure_user_with_role(db, user_id.into_inner(), UserRole::Parent).await?;
        }

        let first_name = dto
            .first_name
            .map(|n| n.trim().to_string())
            .unwrap_or(existing.first_name);
        let last_name = dto
            .last_name
            .map(|n| n.trim().to_string())
            .unwrap_or(existing.last_name);
        let email = dto.email.unwrap_or(existing.email);
        let phone = dto.phone.unwrap_or(existing.phone);
        let address = dto.address.unwrap_or(existing.address);
        let user_id = dto.user_id.unwrap_or(existing.user_id);

        let parent = sqlx::query_as::<_, Parent>(&format!(
            r#"UPDATE parents
               SET first_name = $1, last_name = $2, email = $3, phone = $4, address = $5,
                   user_id = $6, updated_at = NOW()
               WHERE id = $7
               RETURNING {PARENT_COLUMNS}"#
        ))
        .bind(&first_name)
        .bind(&last_name)
        .bind(&email)
        .bind(&phone)
        .bind(&address)
        .bind(user_id)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(map_unique)?;

        Ok(parent)
    }

    /// Refuses while the parent still has students.
    #[instrument]
    pub async fn delete_parent(db: &PgPool, id: ParentId) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        sqlx::query_scalar::<_, ParentId>("SELECT id FROM parents WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Parent {} not found", id)))?;

        let students = count_references(&mut *tx, "students", "parent_id", id.into_inner()).await?;
        if students > 0 {
            return Err(restrict_violation("parent", id.into_inner(), students, "students"));
        }

        sqlx::query("DELETE FROM parents WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(())
    }
}
