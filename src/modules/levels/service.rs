use anyhow::anyhow;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use edutrack_core::{AppError, PaginationMeta};
use edutrack_models::ids::LevelId;

use crate::modules::classrooms::model::Classroom;
use crate::modules::classrooms::service::CLASSROOM_COLUMNS;
use crate::modules::levels::model::{
    CreateLevelDto, Level, LevelDetail, LevelFilterParams, PaginatedLevelsResponse, UpdateLevelDto,
};
use crate::utils::query::search_term;
use crate::utils::references::{count_references, restrict_violation};

const LEVEL_COLUMNS: &str = "id, name, description, created_at, updated_at";

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &LevelFilterParams) {
    builder.push(" WHERE TRUE");
    if let Some(pattern) = search_term(&filters.search) {
        builder.push(" AND name ILIKE ").push_bind(pattern);
    }
}

fn map_unique_name(e: sqlx::Error, name: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::conflict(anyhow!("A level named '{}' already exists", name))
        }
        _ => AppError::from(e),
    }
}

pub struct LevelService;

impl LevelService {
    #[instrument]
    pub async fn create_level(db: &PgPool, dto: CreateLevelDto) -> Result<Level, AppError> {
        let level = sqlx::query_as::<_, Level>(&format!(
            "INSERT INTO levels (name, description) VALUES ($1, $2) RETURNING {LEVEL_COLUMNS}"
        ))
        .bind(dto.name.trim())
        .bind(&dto.description)
        .fetch_one(db)
        .await
        .map_err(|e| map_unique_name(e, &dto.name))?;

        Ok(level)
    }

    #[instrument]
    pub async fn get_levels(
        db: &PgPool,
        filters: LevelFilterParams,
    ) -> Result<PaginatedLevelsResponse, AppError> {
        let limit = filters.pagination.limit();
        let skip = filters.pagination.skip();

        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM levels");
        push_filters(&mut count_query, &filters);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(db)
            .await?;

        let mut data_query = QueryBuilder::new(format!("SELECT {LEVEL_COLUMNS} FROM levels"));
        push_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY id ASC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(skip);
        let levels = data_query.build_query_as::<Level>().fetch_all(db).await?;

        Ok(PaginatedLevelsResponse {
            data: levels,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument]
    pub async fn get_level_by_id(db: &PgPool, id: LevelId) -> Result<Level, AppError> {
        sqlx::query_as::<_, Level>(&format!("SELECT {LEVEL_COLUMNS} FROM levels WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Level {} not found", id)))
    }

    #[instrument]
    pub async fn get_level_detail(db: &PgPool, id: LevelId) -> Result<LevelDetail, AppError> {
        let level = Self::get_level_by_id(db, id).await?;

        let classrooms = sqlx::query_as::<_, Classroom>(&format!(
            "SELECT {CLASSROOM_COLUMNS} FROM classrooms WHERE level_id = $1 ORDER BY id"
        ))
        .bind(id)
        .fetch_all(db)
        .await?;

        Ok(LevelDetail { level, classrooms })
    }

    #[instrument]
    pub async fn update_level(
        db: &PgPool,
        id: LevelId,
        dto: UpdateLevelDto,
    ) -> Result<Level, AppError> {
        let existing = Self::get_level_by_id(db, id).await?;

        let name = dto
            .name
            .map(|n| n.trim().to_string())
            .unwrap_or(existing.name);
        let description = dto.description.unwrap_or(existing.description);

        let level = sqlx::query_as::<_, Level>(&format!(
            r#"UPDATE levels
               SET name = $1, description = $2, updated_at = NOW()
               WHERE id = $3
               RETURNING {LEVEL_COLUMNS}"#
        ))
        .bind(&name)
        .bind(&description)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(|e| map_unique_name(e, &name))?;

        Ok(level)
    }

    /// Refuses while classrooms still belong to the level.
    #[instrument]
    pub async fn delete_level(db: &PgPool, id: LevelId) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        sqlx::query_scalar::<_, LevelId>("SELECT id FROM levels WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Level {} not found", id)))?;

        let classrooms =
            count_references(&mut *tx, "classrooms", "level_id", id.into_inner()).await?;
        if classrooms > 0 {
            return Err(restrict_violation("level", id.into_inner(), classrooms, "classrooms"));
        }

        sqlx::query("DELETE FROM levels WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(())
    }
}
