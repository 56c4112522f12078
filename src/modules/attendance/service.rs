use anyhow::anyhow;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use edutrack_core::{AppError, PaginationMeta};
use edutrack_models::ids::AttendanceId;
use edutrack_observability::track_attendance_recorded;

use crate::modules::attendance::model::{
    Attendance, AttendanceFilterParams, CreateAttendanceDto, PaginatedAttendanceResponse,
    UpdateAttendanceDto,
};
use crate::utils::references::{Reference, ensure_exists};

const ATTENDANCE_COLUMNS: &str = "id, student_id, date, status, remark, created_at, updated_at";

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &AttendanceFilterParams) {
    builder.push(" WHERE TRUE");
    if let Some(student_id) = filters.student_id {
        builder.push(" AND student_id = ").push_bind(student_id);
    }
    if let Some(class_id) = filters.class_id {
        builder
            .push(" AND student_id IN (SELECT id FROM students WHERE class_id = ")
            .push_bind(class_id)
            .push(")");
    }
    if let Some(status) = filters.status {
        builder.push(" AND status = ").push_bind(status);
    }
    if let Some(date_from) = filters.date_from {
        builder.push(" AND date >= ").push_bind(date_from);
    }
    if let Some(date_to) = filters.date_to {
        builder.push(" AND date <= ").push_bind(date_to);
    }
}

fn map_unique(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::conflict(
            anyhow!("Attendance is already recorded for this student on this date"),
        ),
        _ => AppError::from(e),
    }
}

pub struct AttendanceService;

impl AttendanceService {
    #[instrument]
    pub async fn create_attendance(
        db: &PgPool,
        dto: CreateAttendanceDto,
    ) -> Result<Attendance, AppError> {
        ensure_exists(db, Reference::Student, dto.student_id.into_inner(), "student_id").await?;

        let attendance = sqlx::query_as::<_, Attendance>(&format!(
            r#"INSERT INTO attendance (student_id, date, status, remark)
               VALUES ($1, COALESCE($2, CURRENT_DATE), $3, $4)
               RETURNING {ATTENDANCE_COLUMNS}"#
        ))
        .bind(dto.student_id)
        .bind(dto.date)
        .bind(dto.status)
        .bind(&dto.remark)
        .fetch_one(db)
        .await
        .map_err(map_unique)?;

        track_attendance_recorded(attendance.status.as_str());
        Ok(attendance)
    }

    #[instrument]
    pub async fn get_attendance(
        db: &PgPool,
        filters: AttendanceFilterParams,
    ) -> Result<PaginatedAttendanceResponse, AppError> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM attendance");
        push_filters(&mut count_query, &filters);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(db)
            .await?;

        let mut data_query =
            QueryBuilder::new(format!("SELECT {ATTENDANCE_COLUMNS} FROM attendance"));
        push_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY id ASC LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.skip());
        let records = data_query
            .build_query_as::<Attendance>()
            .fetch_all(db)
            .await?;

        Ok(PaginatedAttendanceResponse {
            data: records,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument]
    pub async fn get_attendance_by_id(
        db: &PgPool,
        id: AttendanceId,
    ) -> Result<Attendance, AppError> {
        sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Attendance record {} not found", id)))
    }

    #[instrument]
    pub async fn update_attendance(
        db: &PgPool,
        id: AttendanceId,
        dto: UpdateAttendanceDto,
    ) -> Result<Attendance, AppError> {
        let existing = Self::get_attendance_by_id(db, id).await?;

        let date = dto.date.unwrap_or(existing.date);
        let status = dto.status.unwrap_or(existing.status);
        let remark = dto.remark.unwrap_or(existing.remark);

        sqlx::query_as::<_, Attendance>(&format!(
            r#"UPDATE attendance
               SET date = $1, status = $2, remark = $3, updated_at = NOW()
               WHERE id = $4
               RETURNING {ATTENDANCE_COLUMNS}"#
        ))
        .bind(date)
        .bind(status)
        .bind(&remark)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(map_unique)
    }

    #[instrument]
    pub async fn delete_attendance(db: &PgPool, id: AttendanceId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM attendance WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!(
                "Attendance record {} not found",
                id
            )));
        }
        Ok(())
    }
}
