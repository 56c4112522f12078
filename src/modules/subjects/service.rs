use anyhow::anyhow;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use edutrack_core::{AppError, PaginationMeta};
use edutrack_models::ids::SubjectId;

use crate::modules::subjects::model::{
    CreateSubjectDto, PaginatedSubjectsResponse, Subject, SubjectFilterParams, UpdateSubjectDto,
};
use crate::utils::query::search_term;
use crate::utils::references::{count_references, restrict_violation};

const SUBJECT_COLUMNS: &str = "id, name, code, description, created_at, updated_at";

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &SubjectFilterParams) {
    builder.push(" WHERE TRUE");
    if let Some(pattern) = search_term(&filters.search) {
        builder
            .push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR code ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

fn map_unique(e: sqlx::Error, name: &str, code: Option<&str>) -> AppError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            match (db_err.constraint(), code) {
                (Some("subjects_code_key"), Some(code)) => {
                    AppError::conflict(anyhow!("A subject with code '{}' already exists", code))
                }
                _ => AppError::conflict(anyhow!("A subject named '{}' already exists", name)),
            }
        }
        _ => AppError::from(e),
    }
}

pub struct SubjectService;

impl SubjectService {
    #[instrument]
    pub async fn create_subject(db: &PgPool, dto: CreateSubjectDto) -> Result<Subject, AppError> {
        let name = dto.name.trim();
        let code = dto.code.as_deref().map(str::trim);

        sqlx::query_as::<_, Subject>(&format!(
            "INSERT INTO subjects (name, code, description) VALUES ($1, $2, $3) \
             RETURNING {SUBJECT_COLUMNS}"
        ))
        .bind(name)
        .bind(code)
        .bind(&dto.description)
        .fetch_one(db)
        .await
        .map_err(|e| map_unique(e, name, code))
    }

    #[instrument]
    pub async fn get_subjects(
        db: &PgPool,
        filters: SubjectFilterParams,
    ) -> Result<PaginatedSubjectsResponse, AppError> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM subjects");
        push_filters(&mut count_query, &filters);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(db)
            .await?;

        let mut data_query = QueryBuilder::new(format!("SELECT {SUBJECT_COLUMNS} FROM subjects"));
        push_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY id ASC LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.skip());
        let subjects = data_query.build_query_as::<Subject>().fetch_all(db).await?;

        Ok(PaginatedSubjectsResponse {
            data: subjects,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument]
    pub async fn get_subject_by_id(db: &PgPool, id: SubjectId) -> Result<Subject, AppError> {
        sqlx::query_as::<_, Subject>(&format!(
            "SELECT {SUBJECT_COLUMNS} FROM subjects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Subject {} not found", id)))
    }

    #[instrument]
    pub async fn update_subject(
        db: &PgPool,
        id: SubjectId,
        dto: UpdateSubjectDto,
    ) -> Result<Subject, AppError> {
        let existing = Self::get_subject_by_id(db, id).await?;

        let name = dto
            .name
            .map(|n| n.trim().to_string())
            .unwrap_or(existing.name);
        let code = dto
            .code
            .map(|c| c.map(|c| c.trim().to_string()))
            .unwrap_or(existing.code);
        let description = dto.description.unwrap_or(existing.description);

        sqlx::query_as::<_, Subject>(&format!(
            r#"UPDATE subjects
               SET name = $1, code = $2, description = $3, updated_at = NOW()
               WHERE id = $4
               RETURNING {SUBJECT_COLUMNS}"#
        ))
        .bind(&name)
        .bind(&code)
        .bind(&description)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(|e| map_unique(e, &name, code.as_deref()))
    }

    /// Refuses while grades are recorded for the subject.
    #[instrument]
    pub async fn delete_subject(db: &PgPool, id: SubjectId) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        sqlx::query_scalar::<_, SubjectId>("SELECT id FROM subjects WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Subject {} not found", id)))?;

        let grades = count_references(&mut *tx, "grades", "subject_id", id.into_inner()).await?;
        if grades > 0 {
            return Err(restrict_violation("subject", id.into_inner(), grades, "grades"));
        }

        sqlx::query("DELETE FROM subjects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(())
    }
}
