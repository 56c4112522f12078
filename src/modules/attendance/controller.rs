use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use tracing::instrument;

use edutrack_core::AppError;
use edutrack_models::ids::AttendanceId;

use crate::docs::ErrorResponse;
use crate::modules::attendance::model::{
    Attendance, AttendanceFilterParams, CreateAttendanceDto, PaginatedAttendanceResponse,
    UpdateAttendanceDto,
};
use crate::modules::attendance::service::AttendanceService;
use crate::state::AppState;
use crate::validator::{Path, Query, ValidatedJson};

#[utoipa::path(
    post,
    path = "/attendance",
    request_body = CreateAttendanceDto,
    responses(
        (status = 201, description = "Attendance record created successfully", body = Attendance),
        (status = 409, description = "The student already has a record for this date", body = ErrorResponse),
        (status = 422, description = "Invalid input or unknown reference", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn create_attendance(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateAttendanceDto>,
) -> Result<(StatusCode, Json<Attendance>), AppError> {
    let attendance = AttendanceService::create_attendance(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(attendance)))
}

#[utoipa::path(
    get,
    path = "/attendance",
    params(AttendanceFilterParams),
    responses(
        (status = 200, description = "List of attendance records", body = PaginatedAttendanceResponse)
    ),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_attendance(
    State(state): State<AppState>,
    Query(filters): Query<AttendanceFilterParams>,
) -> Result<Json<PaginatedAttendanceResponse>, AppError> {
    let page = AttendanceService::get_attendance(&state.db, filters).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/attendance/{id}",
    params(
        ("id" = i64, Path, description = "Attendance record ID")
    ),
    responses(
        (status = 200, description = "Attendance record", body = Attendance),
        (status = 404, description = "Attendance record not found", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_attendance_by_id(
    State(state): State<AppState>,
    Path(id): Path<AttendanceId>,
) -> Result<Json<Attendance>, AppError> {
    let attendance = AttendanceService::get_attendance_by_id(&state.db, id).await?;
    Ok(Json(attendance))
}

#[utoipa::path(
    method(put, patch),
    path = "/attendance/{id}",
    params(
        ("id" = i64, Path, description = "Attendance record ID")
    ),
    request_body = UpdateAttendanceDto,
    responses(
        (status = 200, description = "Attendance record updated successfully", body = Attendance),
        (status = 404, description = "Attendance record not found", body = ErrorResponse),
        (status = 409, description = "The student already has a record for this date", body = ErrorResponse),
        (status = 422, description = "Invalid input or unknown reference", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn update_attendance(
    State(state): State<AppState>,
    Path(id): Path<AttendanceId>,
    ValidatedJson(dto): ValidatedJson<UpdateAttendanceDto>,
) -> Result<Json<Attendance>, AppError> {
    let attendance = AttendanceService::update_attendance(&state.db, id, dto).await?;
    Ok(Json(attendance))
}

#[utoipa::path(
    delete,
    path = "/attendance/{id}",
    params(
        ("id" = i64, Path, description = "Attendance record ID")
    ),
    responses(
        (status = 204, description = "Attendance record deleted successfully"),
        (status = 404, description = "Attendance record not found", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn delete_attendance(
    State(state): State<AppState>,
    Path(id): Path<AttendanceId>,
) -> Result<StatusCode, AppError> {
    AttendanceService::delete_attendance(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
