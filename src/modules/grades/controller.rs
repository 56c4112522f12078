use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use tracing::instrument;

use edutrack_core::AppError;
use edutrack_models::ids::GradeId;

use crate::docs::ErrorResponse;
use crate::modules::grades::model::{
    CreateGradeDto, Grade, GradeDetail, GradeFilterParams, PaginatedGradesResponse, UpdateGradeDto,
};
use crate::modules::grades::service::GradeService;
use crate::state::AppState;
use crate::validator::{Path, Query, ValidatedJson};

#[utoipa::path(
    post,
    path = "/grades",
    request_body = CreateGradeDto,
    responses(
        (status = 201, description = "Grade created successfully", body = Grade),
        (status = 409, description = "The student already has a grade for this subject and term", body = ErrorResponse),
        (status = 422, description = "Invalid input or unknown reference", body = ErrorResponse)
    ),
    tag = "Grades"
)]
#[instrument(skip(state))]
pub async fn create_grade(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateGradeDto>,
) -> Result<(StatusCode, Json<Grade>), AppError> {
    let grade = GradeService::create_grade(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(grade)))
}

#[utoipa::path(
    get,
    path = "/grades",
    params(GradeFilterParams),
    responses(
        (status = 200, description = "List of grades", body = PaginatedGradesResponse)
    ),
    tag = "Grades"
)]
#[instrument(skip(state))]
pub async fn get_grades(
    State(state): State<AppState>,
    Query(filters): Query<GradeFilterParams>,
) -> Result<Json<PaginatedGradesResponse>, AppError> {
    let page = GradeService::get_grades(&state.db, filters).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/grades/{id}",
    params(
        ("id" = i64, Path, description = "Grade ID")
    ),
    responses(
        (status = 200, description = "Grade", body = Grade),
        (status = 404, description = "Grade not found", body = ErrorResponse)
    ),
    tag = "Grades"
)]
#[instrument(skip(state))]
pub async fn get_grade_by_id(
    State(state): State<AppState>,
    Path(id): Path<GradeId>,
) -> Result<Json<Grade>, AppError> {
    let grade = GradeService::get_grade_by_id(&state.db, id).await?;
    Ok(Json(grade))
}

#[utoipa::path(
    get,
    path = "/grades/{id}/details",
    params(
        ("id" = i64, Path, description = "Grade ID")
    ),
    responses(
        (status = 200, description = "Grade with its student and subject", body = GradeDetail),
        (status = 404, description = "Grade not found", body = ErrorResponse)
    ),
    tag = "Grades"
)]
#[instrument(skip(state))]
pub async fn get_grade_details(
    State(state): State<AppState>,
    Path(id): Path<GradeId>,
) -> Result<Json<GradeDetail>, AppError> {
    let detail = GradeService::get_grade_detail(&state.db, id).await?;
    Ok(Json(detail))
}

#[utoipa::path(
    method(put, patch),
    path = "/grades/{id}",
    params(
        ("id" = i64, Path, description = "Grade ID")
    ),
    request_body = UpdateGradeDto,
    responses(
        (status = 200, description = "Grade updated successfully", body = Grade),
        (status = 404, description = "Grade not found", body = ErrorResponse),
        (status = 409, description = "The student already has a grade for this subject and term", body = ErrorResponse),
        (status = 422, description = "Invalid input or unknown reference", body = ErrorResponse)
    ),
    tag = "Grades"
)]
#[instrument(skip(state))]
pub async fn update_grade(
    State(state): State<AppState>,
    Path(id): Path<GradeId>,
    ValidatedJson(dto): ValidatedJson<UpdateGradeDto>,
) -> Result<Json<Grade>, AppError> {
    let grade = GradeService::update_grade(&state.db, id, dto).await?;
    Ok(Json(grade))
}

#[utoipa::path(
    delete,
    path = "/grades/{id}",
    params(
        ("id" = i64, Path, description = "Grade ID")
    ),
    responses(
        (status = 204, description = "Grade deleted successfully"),
        (status = 404, description = "Grade not found", body = ErrorResponse)
    ),
    tag = "Grades"
)]
#[instrument(skip(state))]
pub async fn delete_grade(
    State(state): State<AppState>,
    Path(id): Path<GradeId>,
) -> Result<StatusCode, AppError> {
    GradeService::delete_grade(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
