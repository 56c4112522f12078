use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use tracing::instrument;

use edutrack_core::AppError;
use edutrack_models::ids::ParentId;

use crate::docs::ErrorResponse;
use crate::modules::parents::model::{
    CreateParentDto, PaginatedParentsResponse, Parent, ParentDetail, ParentFilterParams,
    UpdateParentDto,
};
use crate::modules::parents::service::ParentService;
use crate::state::AppState;
use crate::validator::{Path, Query, ValidatedJson};

#[utoipa::path(
    post,
    path = "/parents",
    request_body = CreateParentDto,
    responses(
        (status = 201, description = "Parent created successfully", body = Parent),
        (status = 409, description = "Email or user account already used by another parent", body = ErrorResponse),
        (status = 422, description = "Invalid input or unknown reference", body = ErrorResponse)
    ),
    tag = "Parents"
)]
#[instrument(skip(state))]
pub async fn create_parent(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateParentDto>,
) -> Result<(StatusCode, Json<Parent>), AppError> {
    let parent = ParentService::create_parent(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(parent)))
}

#[utoipa::path(
    get,
    path = "/parents",
    params(ParentFilterParams),
    responses(
        (status = 200, description = "List of parents", body = PaginatedParentsResponse)
    ),
    tag = "Parents"
)]
#[instrument(skip(state))]
pub async fn get_parents(
    State(state): State<AppState>,
    Query(filters): Query<ParentFilterParams>,
) -> Result<Json<PaginatedParentsResponse>, AppError> {
    let page = ParentService::get_parents(&state.db, filters).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/parents/{id}",
    params(
        ("id" = i64, Path, description = "Parent ID")
    ),
    responses(
        (status = 200, description = "Parent", body = Parent),
        (status = 404, description = "Parent not found", body = ErrorResponse)
    ),
    tag = "Parents"
)]
#[instrument(skip(state))]
pub async fn get_parent_by_id(
    State(state): State<AppState>,
    Path(id): Path<ParentId>,
) -> Result<Json<Parent>, AppError> {
    let parent = ParentService::get_parent_by_id(&state.db, id).await?;
    Ok(Json(parent))
}

#[utoipa::path(
    get,
    path = "/parents/{id}/details",
    params(
        ("id" = i64, Path, description = "Parent ID")
    ),
    responses(
        (status = 200, description = "Parent with their children", body = ParentDetail),
        (status = 404, description = "Parent not found", body = ErrorResponse)
    ),
    tag = "Parents"
)]
#[instrument(skip(state))]
pub async fn get_parent_details(
    State(state): State<AppState>,
    Path(id): Path<ParentId>,
) -> Result<Json<ParentDetail>, AppError> {
    let detail = ParentService::get_parent_detail(&state.db, id).await?;
    Ok(Json(detail))
}

#[utoipa::path(
    method(put, patch),
    path = "/parents/{id}",
    params(
        ("id" = i64, Path, description = "Parent ID")
    ),
    request_body = UpdateParentDto,
    responses(
        (status = 200, description = "Parent updated successfully", body = Parent),
        (status = 404, description = "Parent not found", body = ErrorResponse),
        (status = 409, description = "Email or user account already used by another parent", body = ErrorResponse),
        (status = 422, description = "Invalid input or unknown reference", body = ErrorResponse)
    ),
    tag = "Parents"
)]
#[instrument(skip(state))]
pub async fn update_parent(
    State(state): State<AppState>,
    Path(id): Path<ParentId>,
    ValidatedJson(dto): ValidatedJson<UpdateParentDto>,
) -> Result<Json<Parent>, AppError> {
    let parent = ParentService::update_parent(&state.db, id, dto).await?;
    Ok(Json(parent))
}

#[utoipa::path(
    delete,
    path = "/parents/{id}",
    params(
        ("id" = i64, Path, description = "Parent ID")
    ),
    responses(
        (status = 204, description = "Parent deleted successfully"),
        (status = 404, description = "Parent not found", body = ErrorResponse),
        (status = 409, description = "Students still reference this parent", body = ErrorResponse)
    ),
    tag = "Parents"
)]
#[instrument(skip(state))]
pub async fn delete_parent(
    State(state): State<AppState>,
    Path(id): Path<ParentId>,
) -> Result<StatusCode, AppError> {
    ParentService::delete_parent(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
