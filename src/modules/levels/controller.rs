use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use tracing::instrument;

use edutrack_core::AppError;
use edutrack_models::ids::LevelId;

use crate::docs::ErrorResponse;
use crate::modules::levels::model::{
    CreateLevelDto, Level, LevelDetail, LevelFilterParams, PaginatedLevelsResponse, UpdateLevelDto,
};
use crate::modules::levels::service::LevelService;
use crate::state::AppState;
use crate::validator::{Path, Query, ValidatedJson};

#[utoipa::path(
    post,
    path = "/levels",
    request_body = CreateLevelDto,
    responses(
        (status = 201, description = "Level created successfully", body = Level),
        (status = 409, description = "A level with this name already exists", body = ErrorResponse),
        (status = 422, description = "Invalid input", body = ErrorResponse)
    ),
    tag = "Levels"
)]
#[instrument(skip(state))]
pub async fn create_level(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateLevelDto>,
) -> Result<(StatusCode, Json<Level>), AppError> {
    let level = LevelService::create_level(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(level)))
}

#[utoipa::path(
    get,
    path = "/levels",
    params(LevelFilterParams),
    responses(
        (status = 200, description = "List of levels", body = PaginatedLevelsResponse)
    ),
    tag = "Levels"
)]
#[instrument(skip(state))]
pub async fn get_levels(
    State(state): State<AppState>,
    Query(filters): Query<LevelFilterParams>,
) -> Result<Json<PaginatedLevelsResponse>, AppError> {
    let levels = LevelService::get_levels(&state.db, filters).await?;
    Ok(Json(levels))
}

#[utoipa::path(
    get,
    path = "/levels/{id}",
    params(
        ("id" = i64, Path, description = "Level ID")
    ),
    responses(
        (status = 200, description = "Level", body = Level),
        (status = 404, description = "Level not found", body = ErrorResponse)
    ),
    tag = "Levels"
)]
#[instrument(skip(state))]
pub async fn get_level_by_id(
    State(state): State<AppState>,
    Path(id): Path<LevelId>,
) -> Result<Json<Level>, AppError> {
    let level = LevelService::get_level_by_id(&state.db, id).await?;
    Ok(Json(level))
}

#[utoipa::path(
    get,
    path = "/levels/{id}/details",
    params(
        ("id" = i64, Path, description = "Level ID")
    ),
    responses(
        (status = 200, description = "Level with its classrooms", body = LevelDetail),
        (status = 404, description = "Level not found", body = ErrorResponse)
    ),
    tag = "Levels"
)]
#[instrument(skip(state))]
pub async fn get_level_details(
    State(state): State<AppState>,
    Path(id): Path<LevelId>,
) -> Result<Json<LevelDetail>, AppError> {
    let detail = LevelService::get_level_detail(&state.db, id).await?;
    Ok(Json(detail))
}

#[utoipa::path(
    method(put, patch),
    path = "/levels/{id}",
    params(
        ("id" = i64, Path, description = "Level ID")
    ),
    request_body = UpdateLevelDto,
    responses(
        (status = 200, description = "Level updated successfully", body = Level),
        (status = 404, description = "Level not found", body = ErrorResponse),
        (status = 409, description = "A level with this name already exists", body = ErrorResponse),
        (status = 422, description = "Invalid input", body = ErrorResponse)
    ),
    tag = "Levels"
)]
#[instrument(skip(state))]
pub async fn update_level(
    State(state): State<AppState>,
    Path(id): Path<LevelId>,
    ValidatedJson(dto): ValidatedJson<UpdateLevelDto>,
) -> Result<Json<Level>, AppError> {
    let level = LevelService::update_level(&state.db, id, dto).await?;
    Ok(Json(level))
}

#[utoipa::path(
    delete,
    path = "/levels/{id}",
    params(
        ("id" = i64, Path, description = "Level ID")
    ),
    responses(
        (status = 204, description = "Level deleted successfully"),
        (status = 404, description = "Level not found", body = ErrorResponse),
        (status = 409, description = "Classrooms still belong to this level", body = ErrorResponse)
    ),
    tag = "Levels"
)]
#[instrument(skip(state))]
pub async fn delete_level(
    State(state): State<AppState>,
    Path(id): Path<LevelId>,
) -> Result<StatusCode, AppError> {
    LevelService::delete_level(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
