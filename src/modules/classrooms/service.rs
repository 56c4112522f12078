use anyhow::anyhow;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use edutrack_core::{AppError, PaginationMeta};
use edutrack_models::ids::ClassroomId;

use crate::modules::classrooms::model::{
    Classroom, ClassroomDetail, ClassroomFilterParams, CreateClassroomDto,
    PaginatedClassroomsResponse, UpdateClassroomDto,
};
use crate::modules::levels::service::LevelService;
use crate::modules::students::model::Student;
use crate::modules::students::service::STUDENT_COLUMNS;
use crate::modules::teachers::model::Teacher;
use crate::modules::teachers::service::TEACHER_COLUMNS;
use crate::utils::references::{
    Reference, count_references, ensure_exists, restrict_violation,
};

pub(crate) const CLASSROOM_COLUMNS: &str =
    "id, name, capacity, schedule, level_id, teacher_id, created_at, updated_at";

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &ClassroomFilterParams) {
    builder.push(" WHERE TRUE");
    if let Some(level_id) = filters.level_id {
        builder.push(" AND level_id = ").push_bind(level_id);
    }
    if let Some(teacher_id) = filters.teacher_id {
        builder.push(" AND teacher_id = ").push_bind(teacher_id);
    }
}

fn map_unique_name(e: sqlx::Error, name: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::conflict(
            anyhow!("A classroom named '{}' already exists in this level", name),
        ),
        _ => AppError::from(e),
    }
}

pub struct ClassroomService;

impl ClassroomService {
    #[instrument]
    pub async fn create_classroom(
        db: &PgPool,
        dto: CreateClassroomDto,
    ) -> Result<Classroom, AppError> {
        ensure_exists(db, Reference::Level, dto.level_id.into_inner(), "level_id").await?;
        if let Some(teacher_id) = dto.teacher_id {
            ensure_exists(db, Reference::Teacher, teacher_id.into_inner(), "teacher_id").await?;
        }

        let classroom = sqlx::query_as::<_, Classroom>(&format!(
            r#"INSERT INTO classrooms (name, capacity, schedule, level_id, teacher_id)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING {CLASSROOM_COLUMNS}"#
        ))
        .bind(dto.name.trim())
        .bind(dto.capacity)
        .bind(&dto.schedule)
        .bind(dto.level_id)
        .bind(dto.teacher_id)
        .fetch_one(db)
        .await
        .map_err(|e| map_unique_name(e, &dto.name))?;

        Ok(classroom)
    }

    #[instrument]
    pub async fn get_classrooms(
        db: &PgPool,
        filters: ClassroomFilterParams,
    ) -> Result<PaginatedClassroomsResponse, AppError> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM classrooms");
        push_filters(&mut count_query, &filters);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(db)
            .await?;

        let mut data_query =
            QueryBuilder::new(format!("SELECT {CLASSROOM_COLUMNS} FROM classrooms"));
        push_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY id ASC LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.skip());
        let classrooms = data_query
            .build_query_as::<Classroom>()
            .fetch_all(db)
            .await?;

        Ok(PaginatedClassroomsResponse {
            data: classrooms,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument]
    pub async fn get_classroom_by_id(db: &PgPool, id: ClassroomId) -> Result<Classroom, AppError> {
        sqlx::query_as::<_, Classroom>(&format!(
            "SELECT {CLASSROOM_COLUMNS} FROM classrooms WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Classroom {} not found", id)))
    }

    #[instrument]
    pub async fn get_classroom_detail(
        db: &PgPool,
        id: ClassroomId,
    ) -> Result<ClassroomDetail, AppError> {
        let classroom = Self::get_classroom_by_id(db, id).await?;
        let level = LevelService::get_level_by_id(db, classroom.level_id).await?;

        let teacher = match classroom.teacher_id {
            Some(teacher_id) => {
                sqlx::query_as::<_, Teacher>(&format!(
                    "SELECT {TEACHER_COLUMNS} FROM teachers WHERE id = $1"
                ))
                .bind(teacher_id)
                .fetch_optional(db)
                .await?
            }
            None => None,
        };

        let students = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE class_id = $1 ORDER BY id"
        ))
        .bind(id)
        .fetch_all(db)
        .await?;

        Ok(ClassroomDetail {
            classroom,
            level,
            teacher,
            student_count: students.len() as i64,
            students,
        })
    }

    #[instrument]
    pub async fn update_classroom(
        db: &PgPool,
        id: ClassroomId,
        dto: UpdateClassroomDto,
    ) -> Result<Classroom, AppError> {
        let mut tx = db.begin().await?;

        // Locked so enrolment cannot grow past the new capacity before commit.
        let existing = sqlx::query_as::<_, Classroom>(&format!(
            "SELECT {CLASSROOM_COLUMNS} FROM classrooms WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Classroom {} not found", id)))?;

        if let Some(level_id) = dto.level_id {
            ensure_exists(&mut *tx, Reference::Level, level_id.into_inner(), "level_id").await?;
        }
        if let Some(Some(teacher_id)) = dto.teacher_id {
            ensure_exists(
                &mut *tx,
                Reference::Teacher,
                teacher_id.into_inner(),
                "teacher_id",
            )
            .await?;
        }
        if let Some(capacity) = dto.capacity {
            let enrolled =
                count_references(&mut *tx, "students", "class_id", id.into_inner()).await?;
            if i64::from(capacity) < enrolled {
                return Err(AppError::conflict(anyhow!(
                    "Classroom {} has {} students; capacity cannot be lowered to {}",
                    id,
                    enrolled,
                    capacity
                )));
            }
        }

        let name = dto
            .name
            .map(|n| n.trim().to_string())
            .unwrap_or(existing.name);
        let capacity = dto.capacity.unwrap_or(existing.capacity);
        let schedule = dto.schedule.unwrap_or(existing.schedule);
        let level_id = dto.level_id.unwrap_or(existing.level_id);
        let teacher_id = dto.teacher_id.unwrap_or(existing.teacher_id);

        let classroom = sqlx::query_as::<_, Classroom>(&format!(
            r#"UPDATE classrooms
               SET name = $1, capacity = $2, schedule = $3, level_id = $4, teacher_id = $5,
                   updated_at = NOW()
               WHERE id = $6
               RETURNING {CLASSROOM_COLUMNS}"#
        ))
        .bind(&name)
        .bind(capacity)
        .bind(&schedule)
        .bind(level_id)
        .bind(teacher_id)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_name(e, &name))?;
        tx.commit().await?;

        Ok(classroom)
    }

    /// Refuses while students are assigned to the classroom.
    #[instrument]
    pub async fn delete_classroom(db: &PgPool, id: ClassroomId) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        sqlx::query_scalar::<_, ClassroomId>("SELECT id FROM classrooms WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Classroom {} not found", id)))?;

        let students = count_references(&mut *tx, "students", "class_id", id.into_inner()).await?;
        if students > 0 {
            return Err(restrict_violation("classroom", id.into_inner(), students, "students"));
        }

        sqlx::query("DELETE FROM classrooms WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(())
    }

    /// Locks the classroom row and checks it can take one more student.
    ///
    /// Fails with 422 naming `class_id` when the classroom does not exist and
    /// 409 when it is full.
    pub(crate) async fn reserve_seat(
        conn: &mut sqlx::PgConnection,
        class_id: ClassroomId,
    ) -> Result<(), AppError> {
        let capacity = sqlx::query_scalar::<_, i32>(
            "SELECT capacity FROM classrooms WHERE id = $1 FOR UPDATE",
        )
        .bind(class_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::missing_reference("class_id", "Classroom", class_id))?;

        let enrolled =
            count_references(&mut *conn, "students", "class_id", class_id.into_inner()).await?;
        if enrolled >= i64::from(capacity) {
            return Err(AppError::conflict(anyhow!(
                "Classroom {} is full ({} of {} seats taken)",
                class_id,
                enrolled,
                capacity
            )));
        }
        Ok(())
    }
}
