use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use tracing::instrument;

use edutrack_core::AppError;
use edutrack_models::ids::ClassroomId;

use crate::docs::ErrorResponse;
use crate::modules::classrooms::model::{
    Classroom, ClassroomDetail, ClassroomFilterParams, CreateClassroomDto,
    PaginatedClassroomsResponse, UpdateClassroomDto,
};
use crate::modules::classrooms::service::ClassroomService;
use crate::state::AppState;
use crate::validator::{Path, Query, ValidatedJson};

#[utoipa::path(
    post,
    path = "/classrooms",
    request_body = CreateClassroomDto,
    responses(
        (status = 201, description = "Classroom created successfully", body = Classroom),
        (status = 409, description = "A classroom with this name already exists in the level", body = ErrorResponse),
        (status = 422, description = "Invalid input or unknown reference", body = ErrorResponse)
    ),
    tag = "Classrooms"
)]
#[instrument(skip(state))]
pub async fn create_classroom(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateClassroomDto>,
) -> Result<(StatusCode, Json<Classroom>), AppError> {
    let classroom = ClassroomService::create_classroom(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(classroom)))
}

#[utoipa::path(
    get,
    path = "/classrooms",
    params(ClassroomFilterParams),
    responses(
        (status = 200, description = "List of classrooms", body = PaginatedClassroomsResponse)
    ),
    tag = "Classrooms"
)]
#[instrument(skip(state))]
pub async fn get_classrooms(
    State(state): State<AppState>,
    Query(filters): Query<ClassroomFilterParams>,
) -> Result<Json<PaginatedClassroomsResponse>, AppError> {
    let page = ClassroomService::get_classrooms(&state.db, filters).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/classrooms/{id}",
    params(
        ("id" = i64, Path, description = "Classroom ID")
    ),
    responses(
        (status = 200, description = "Classroom", body = Classroom),
        (status = 404, description = "Classroom not found", body = ErrorResponse)
    ),
    tag = "Classrooms"
)]
#[instrument(skip(state))]
pub async fn get_classroom_by_id(
    State(state): State<AppState>,
    Path(id): Path<ClassroomId>,
) -> Result<Json<Classroom>, AppError> {
    let classroom = ClassroomService::get_classroom_by_id(&state.db, id).await?;
    Ok(Json(classroom))
}

#[utoipa::path(
    get,
    path = "/classrooms/{id}/details",
    params(
        ("id" = i64, Path, description = "Classroom ID")
    ),
    responses(
        (status = 200, description = "Classroom with its level, teacher and students", body = ClassroomDetail),
        (status = 404, description = "Classroom not found", body = ErrorResponse)
    ),
    tag = "Classrooms"
)]
#[instrument(skip(state))]
pub async fn get_classroom_details(
    State(state): State<AppState>,
    Path(id): Path<ClassroomId>,
) -> Result<Json<ClassroomDetail>, AppError> {
    let detail = ClassroomService::get_classroom_detail(&state.db, id).await?;
    Ok(Json(detail))
}

#[utoipa::path(
    method(put, patch),
    path = "/classrooms/{id}",
    params(
        ("id" = i64, Path, description = "Classroom ID")
    ),
    request_body = UpdateClassroomDto,
    responses(
        (status = 200, description = "Classroom updated successfully", body = Classroom),
        (status = 404, description = "Classroom not found", body = ErrorResponse),
        (status = 409, description = "Name already taken in the level, or capacity below current enrollment", body = ErrorResponse),
        (status = 422, description = "Invalid input or unknown reference", body = ErrorResponse)
    ),
    tag = "Classrooms"
)]
#[instrument(skip(state))]
pub async fn update_classroom(
    State(state): State<AppState>,
    Path(id): Path<ClassroomId>,
    ValidatedJson(dto): ValidatedJson<UpdateClassroomDto>,
) -> Result<Json<Classroom>, AppError> {
    let classroom = ClassroomService::update_classroom(&state.db, id, dto).await?;
    Ok(Json(classroom))
}

#[utoipa::path(
    delete,
    path = "/classrooms/{id}",
    params(
        ("id" = i64, Path, description = "Classroom ID")
    ),
    responses(
        (status = 204, description = "Classroom deleted successfully"),
        (status = 404, description = "Classroom not found", body = ErrorResponse),
        (status = 409, description = "Students are still assigned to this classroom", body = ErrorResponse)
    ),
    tag = "Classrooms"
)]
#[instrument(skip(state))]
pub async fn delete_classroom(
    State(state): State<AppState>,
    Path(id): Path<ClassroomId>,
) -> Result<StatusCode, AppError> {
    ClassroomService::delete_classroom(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
