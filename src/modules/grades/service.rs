use anyhow::anyhow;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use edutrack_core::{AppError, PaginationMeta};
use edutrack_models::ids::GradeId;
use edutrack_observability::track_grade_recorded;

use crate::modules::grades::model::{
    CreateGradeDto, Grade, GradeDetail, GradeFilterParams, PaginatedGradesResponse, UpdateGradeDto,
};
use crate::modules::students::service::StudentService;
use crate::modules::subjects::service::SubjectService;
use crate::utils::references::{Reference, ensure_exists};

const GRADE_COLUMNS: &str =
    "id, student_id, subject_id, term, score, comment, created_at, updated_at";

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &GradeFilterParams) {
    builder.push(" WHERE TRUE");
    if let Some(student_id) = filters.student_id {
        builder.push(" AND student_id = ").push_bind(student_id);
    }
    if let Some(subject_id) = filters.subject_id {
        builder.push(" AND subject_id = ").push_bind(subject_id);
    }
    if let Some(term) = filters.term {
        builder.push(" AND term = ").push_bind(term);
    }
    if let Some(class_id) = filters.class_id {
        builder
            .push(" AND student_id IN (SELECT id FROM students WHERE class_id = ")
            .push_bind(class_id)
            .push(")");
    }
}

fn map_unique(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::conflict(
            anyhow!("The student already has a grade for this subject and term"),
        ),
        _ => AppError::from(e),
    }
}

pub struct GradeService;

impl GradeService {
    #[instrument]
    pub async fn create_grade(db: &PgPool, dto: CreateGradeDto) -> Result<Grade, AppError> {
        ensure_exists(db, Reference::Student, dto.student_id.into_inner(), "student_id").await?;
        ensure_exists(db, Reference::Subject, dto.subject_id.into_inner(), "subject_id").await?;

        let grade = sqlx::query_as::<_, Grade>(&format!(
            r#"INSERT INTO grades (student_id, subject_id, term, score, comment)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING {GRADE_COLUMNS}"#
        ))
        .bind(dto.student_id)
        .bind(dto.subject_id)
        .bind(dto.term)
        .bind(dto.score)
        .bind(&dto.comment)
        .fetch_one(db)
        .await
        .map_err(map_unique)?;

        track_grade_recorded(grade.term.as_str());
        Ok(grade)
    }

    #[instrument]
    pub async fn get_grades(
        db: &PgPool,
        filters: GradeFilterParams,
    ) -> Result<PaginatedGradesResponse, AppError> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM grades");
        push_filters(&mut count_query, &filters);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(db)
            .await?;

        let mut data_query = QueryBuilder::new(format!("SELECT {GRADE_COLUMNS} FROM grades"));
        push_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY id ASC LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.skip());
        let grades = data_query.build_query_as::<Grade>().fetch_all(db).await?;

        Ok(PaginatedGradesResponse {
            data: grades,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument]
    pub async fn get_grade_by_id(db: &PgPool, id: GradeId) -> Result<Grade, AppError> {
        sqlx::query_as::<_, Grade>(&format!("SELECT {GRADE_COLUMNS} FROM grades WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Grade {} not found", id)))
    }

    #[instrument]
    pub async fn get_grade_detail(db: &PgPool, id: GradeId) -> Result<GradeDetail, AppError> {
        let grade = Self::get_grade_by_id(db, id).await?;
        let student = StudentService::get_student_by_id(db, grade.student_id).await?;
        let subject = SubjectService::get_subject_by_id(db, grade.subject_id).await?;

        Ok(GradeDetail {
            grade,
            student,
            subject,
        })
    }

    #[instrument]
    pub async fn update_grade(
        db: &PgPool,
        id: GradeId,
        dto: UpdateGradeDto,
    ) -> Result<Grade, AppError> {
        let existing = Self::get_grade_by_id(db, id).await?;

        if let Some(student_id) = dto.student_id {
            ensure_exists(db, Reference::Student, student_id.into_inner(), "student_id").await?;
        }
        if let Some(subject_id) = dto.subject_id {
            ensure_exists(db, Reference::Subject, subject_id.into_inner(), "subject_id").await?;
        }

        let student_id = dto.student_id.unwrap_or(existing.student_id);
        let subject_id = dto.subject_id.unwrap_or(existing.subject_id);
        let term = dto.term.unwrap_or(existing.term);
        let score = dto.score.unwrap_or(existing.score);
        let comment = dto.comment.unwrap_or(existing.comment);

        sqlx::query_as::<_, Grade>(&format!(
            r#"UPDATE grades
               SET student_id = $1, subject_id = $2, term = $3, score = $4, comment = $5,
                   updated_at = NOW()
               WHERE id = $6
               RETURNING {GRADE_COLUMNS}"#
        ))
        .bind(student_id)
        .bind(subject_id)
        .bind(term)
        .bind(score)
        .bind(&comment)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(map_unique)
    }

    #[instrument]
    pub async fn delete_grade(db: &PgPool, id: GradeId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM grades WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Grade {} not found", id)));
        }
        Ok(())
    }
}
