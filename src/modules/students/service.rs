use anyhow::anyhow;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument};

use edutrack_core::{AppError, PaginationMeta};
use edutrack_models::ids::StudentId;
use edutrack_observability::track_student_enrolled;

use crate::modules::classrooms::model::Classroom;
use crate::modules::classrooms::service::{CLASSROOM_COLUMNS, ClassroomService};
use crate::modules::parents::model::Parent;
use crate::modules::parents::service::PARENT_COLUMNS;
use crate::modules::students::model::{
    CreateStudentDto, PaginatedStudentsResponse, Student, StudentDetail, StudentFilterParams,
    UpdateStudentDto,
};
use crate::utils::query::search_term;
use crate::utils::references::{Reference, ensure_exists};

pub(crate) const STUDENT_COLUMNS: &str = "id, first_name, last_name, birth_date, gender, \
     enrollment_status, enrollment_date, parent_id, class_id, created_at, updated_at";

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &StudentFilterParams) {
    builder.push(" WHERE TRUE");
    if let Some(parent_id) = filters.parent_id {
        builder.push(" AND parent_id = ").push_bind(parent_id);
    }
    if let Some(class_id) = filters.class_id {
        builder.push(" AND class_id = ").push_bind(class_id);
    }
    if let Some(gender) = filters.gender {
        builder.push(" AND gender = ").push_bind(gender);
    }
    if let Some(status) = filters.enrollment_status {
        builder.push(" AND enrollment_status = ").push_bind(status);
    }
    if let Some(pattern) = search_term(&filters.search) {
        builder
            .push(" AND (first_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR last_name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

pub struct StudentService;

impl StudentService {
    /// Enrolls a student, taking a seat in the target classroom.
    #[instrument]
    pub async fn create_student(db: &PgPool, dto: CreateStudentDto) -> Result<Student, AppError> {
        let mut tx = db.begin().await?;

        ensure_exists(&mut *tx, Reference::Parent, dto.parent_id.into_inner(), "parent_id").await?;
        ClassroomService::reserve_seat(&mut *tx, dto.class_id).await?;

        let student = sqlx::query_as::<_, Student>(&format!(
            r#"INSERT INTO students
                   (first_name, last_name, birth_date, gender, enrollment_status, enrollment_date,
                    parent_id, class_id)
               VALUES ($1, $2, $3, $4, COALESCE($5, 'enrolled'::enrollment_status),
                       COALESCE($6, CURRENT_DATE), $7, $8)
               RETURNING {STUDENT_COLUMNS}"#
        ))
        .bind(dto.first_name.trim())
        .bind(dto.last_name.trim())
        .bind(dto.birth_date)
        .bind(dto.gender)
        .bind(dto.enrollment_status)
        .bind(dto.enrollment_date)
        .bind(dto.parent_id)
        .bind(dto.class_id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        track_student_enrolled();
        info!(student_id = %student.id, class_id = %student.class_id, "Student enrolled");

        Ok(student)
    }

    #[instrument]
    pub async fn get_students(
        db: &PgPool,
        filters: StudentFilterParams,
    ) -> Result<PaginatedStudentsResponse, AppError> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM students");
        push_filters(&mut count_query, &filters);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(db)
            .await?;

        let mut data_query = QueryBuilder::new(format!("SELECT {STUDENT_COLUMNS} FROM students"));
        push_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY id ASC LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.skip());
        let students = data_query.build_query_as::<Student>().fetch_all(db).await?;

        Ok(PaginatedStudentsResponse {
            data: students,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument]
    pub async fn get_student_by_id(db: &PgPool, id: StudentId) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Student {} not found", id)))
    }

    #[instrument]
    pub async fn get_student_detail(db: &PgPool, id: StudentId) -> Result<StudentDetail, AppError> {
        let student = Self::get_student_by_id(db, id).await?;

        let parent = sqlx::query_as::<_, Parent>(&format!(
            "SELECT {PARENT_COLUMNS} FROM parents WHERE id = $1"
        ))
        .bind(student.parent_id)
        .fetch_one(db)
        .await?;

        let classroom = sqlx::query_as::<_, Classroom>(&format!(
            "SELECT {CLASSROOM_COLUMNS} FROM classrooms WHERE id = $1"
        ))
        .bind(student.class_id)
        .fetch_one(db)
        .await?;

        Ok(StudentDetail {
            student,
            parent,
            classroom,
        })
    }

    /// Moving a student to another classroom takes a seat there first.
    #[instrument]
    pub async fn update_student(
        db: &PgPool,
        id: StudentId,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        let mut tx = db.begin().await?;

        let existing = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Student {} not found", id)))?;

        if let Some(parent_id) = dto.parent_id {
            ensure_exists(&mut *tx, Reference::Parent, parent_id.into_inner(), "parent_id").await?;
        }
        if let Some(class_id) = dto.class_id.filter(|c| *c != existing.class_id) {
            ClassroomService::reserve_seat(&mut *tx, class_id).await?;
        }

        let first_name = dto
            .first_name
            .map(|n| n.trim().to_string())
            .unwrap_or(existing.first_name);
        let last_name = dto
            .last_name
            .map(|n| n.trim().to_string())
            .unwrap_or(existing.last_name);
        let birth_date = dto.birth_date.unwrap_or(existing.birth_date);
        let gender = dto.gender.unwrap_or(existing.gender);
        let enrollment_status = dto.enrollment_status.unwrap_or(existing.enrollment_status);
        let enrollment_date = dto.enrollment_date.unwrap_or(existing.enrollment_date);
        let parent_id = dto.parent_id.unwrap_or(existing.parent_id);
        let class_id = dto.class_id.unwrap_or(existing.class_id);

        let student = sqlx::query_as::<_, Student>(&format!(
            r#"UPDATE students
               SET first_name = $1, last_name = $2, birth_date = $3, gender = $4,
                   enrollment_status = $5, enrollment_date = $6, parent_id = $7, class_id = $8,
                   updated_at = NOW()
               WHERE id = $9
               RETURNING {STUDENT_COLUMNS}"#
        ))
        .bind(&first_name)
        .bind(&last_name)
        .bind(birth_date)
        .bind(gender)
        .bind(enrollment_status)
        .bind(enrollment_date)
        .bind(parent_id)
        .bind(class_id)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(student)
    }

    /// Grades, payments and attendance of the student are removed with it.
    #[instrument]
    pub async fn delete_student(db: &PgPool, id: StudentId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Student {} not found", id)));
        }
        Ok(())
    }
}
