use anyhow::anyhow;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use edutrack_core::{AppError, PaginationMeta};
use edutrack_models::ids::TeacherId;
use edutrack_models::users::UserRole;

use crate::modules::classrooms::model::Classroom;
use crate::modules::classrooms::service::CLASSROOM_COLUMNS;
use crate::modules::teachers::model::{
    CreateTeacherDto, PaginatedTeachersResponse, Teacher, TeacherDetail, TeacherFilterParams,
    UpdateTeacherDto,
};
use crate::utils::query::search_term;
use crate::utils::references::ensure_user_with_role;

pub(crate) const TEACHER_COLUMNS: &str = "id, first_name, last_name, email, phone, specialty, \
     hire_date, user_id, created_at, updated_at";

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &TeacherFilterParams) {
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
                Some("teachers_user_id_key") => AppError::conflict(anyhow!(
                    "This user account is already linked to another teacher"
                )),
                _ => AppError::conflict(anyhow!("A teacher with this email already exists")),
            }
        }
        _ => AppError::from(e),
    }
}

pub struct TeacherService;

impl TeacherService {
    #[instrument]
    pub async fn create_teacher(db: &PgPool, dto: CreateTeacherDto) -> Result<Teacher, AppError> {
        if let Some(user_id) = dto.user_id {
            ensure_user_with_role(db, user_id.into_inner(), UserRole::Teacher).await?;
        }

        let teacher = sqlx::query_as::<_, Teacher>(&format!(
            r#"INSERT INTO teachers (first_name, last_name, email, phone, specialty, hire_date, user_id)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING {TEACHER_COLUMNS}"#
        ))
        .bind(dto.first_name.trim())
        .bind(dto.last_name.trim())
        .bind(&dto.email)
        .bind(&dto.phone)
        .bind(&dto.specialty)
        .bind(dto.hire_date)
        .bind(dto.user_id)
        .fetch_one(db)
        .await
        .map_err(map_unique)?;

        Ok(teacher)
    }

    #[instrument]
    pub async fn get_teachers(
        db: &PgPool,
        filters: TeacherFilterParams,
    ) -> Result<PaginatedTeachersResponse, AppError> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM teachers");
        push_filters(&mut count_query, &filters);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(db)
            .await?;

        let mut data_query = QueryBuilder::new(format!("SELECT {TEACHER_COLUMNS} FROM teachers"));
        push_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY id ASC LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.skip());
        let teachers = data_query.build_query_as::<Teacher>().fetch_all(db).await?;

        Ok(PaginatedTeachersResponse {
            data: teachers,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument]
    pub async fn get_teacher_by_id(db: &PgPool, id: TeacherId) -> Result<Teacher, AppError> {
        sqlx::query_as::<_, Teacher>(&format!(
            "SELECT {TEACHER_COLUMNS} FROM teachers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Teacher {} not found", id)))
    }

    #[instrument]
    pub async fn get_teacher_detail(db: &PgPool, id: TeacherId) -> Result<TeacherDetail, AppError> {
        let teacher = Self::get_teacher_by_id(db, id).await?;

        let classrooms = sqlx::query_as::<_, Classroom>(&format!(
            "SELECT {CLASSROOM_COLUMNS} FROM classrooms WHERE teacher_id = $1 ORDER BY id"
        ))
        .bind(id)
        .fetch_all(db)
        .await?;

        Ok(TeacherDetail {
            teacher,
            classrooms,
        })
    }

    #[instrument]
    pub async fn update_teacher(
        db: &PgPool,
        id: TeacherId,
        dto: UpdateTeacherDto,
    ) -> Result<Teacher, AppError> {
        let existing = Self::get_teacher_by_id(db, id).await?;

        if let Some(Some(user_id)) = dto.user_id {
            ensure_user_with_role(db, user_id.into_inner(), UserRole::Teacher).await?;
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
        let specialty = dto.specialty.unwrap_or(existing.specialty);
        let hire_date = dto.hire_date.unwrap_or(existing.hire_date);
        let user_id = dto.user_id.unwrap_or(existing.user_id);

        let teacher = sqlx::query_as::<_, Teacher>(&format!(
            r#"UPDATE teachers
               SET first_name = $1, last_name = $2, email = $3, phone = $4, specialty = $5,
                   hire_date = $6, user_id = $7, updated_at = NOW()
               WHERE id = $8
               RETURNING {TEACHER_COLUMNS}"#
        ))
        .bind(&first_name)
        .bind(&last_name)
        .bind(&email)
        .bind(&phone)
        .bind(&specialty)
        .bind(hire_date)
        .bind(user_id)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(map_unique)?;

        Ok(teacher)
    }

    /// Classrooms led by the teacher are left without one.
    #[instrument]
    pub async fn delete_teacher(db: &PgPool, id: TeacherId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM teachers WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Teacher {} not found", id)));
        }
        Ok(())
    }
}
