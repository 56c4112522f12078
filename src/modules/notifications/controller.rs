use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use tracing::instrument;

use edutrack_core::AppError;
use edutrack_models::ids::NotificationId;

use crate::docs::ErrorResponse;
use crate::modules::notifications::model::{
    CreateNotificationDto, Notification, NotificationFilterParams, PaginatedNotificationsResponse,
    UpdateNotificationDto,
};
use crate::modules::notifications::service::NotificationService;
use crate::state::AppState;
use crate::validator::{Path, Query, ValidatedJson};

#[utoipa::path(
    post,
    path = "/notifications",
    request_body = CreateNotificationDto,
    responses(
        (status = 201, description = "Notification created successfully", body = Notification),
        (status = 422, description = "Invalid input or unknown reference", body = ErrorResponse)
    ),
    tag = "Notifications"
)]
#[instrument(skip(state))]
pub async fn create_notification(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateNotificationDto>,
) -> Result<(StatusCode, Json<Notification>), AppError> {
    let notification = NotificationService::create_notification(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(notification)))
}

#[utoipa::path(
    get,
    path = "/notifications",
    params(NotificationFilterParams),
    responses(
        (status = 200, description = "List of notifications", body = PaginatedNotificationsResponse)
    ),
    tag = "Notifications"
)]
#[instrument(skip(state))]
pub async fn get_notifications(
    State(state): State<AppState>,
    Query(filters): Query<NotificationFilterParams>,
) -> Result<Json<PaginatedNotificationsResponse>, AppError> {
    let page = NotificationService::get_notifications(&state.db, filters).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/notifications/{id}",
    params(
        ("id" = i64, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification", body = Notification),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    ),
    tag = "Notifications"
)]
#[instrument(skip(state))]
pub async fn get_notification_by_id(
    State(state): State<AppState>,
    Path(id): Path<NotificationId>,
) -> Result<Json<Notification>, AppError> {
    let notification = NotificationService::get_notification_by_id(&state.db, id).await?;
    Ok(Json(notification))
}

#[utoipa::path(
    method(put, patch),
    path = "/notifications/{id}",
    params(
        ("id" = i64, Path, description = "Notification ID")
    ),
    request_body = UpdateNotificationDto,
    responses(
        (status = 200, description = "Notification updated successfully", body = Notification),
        (status = 404, description = "Notification not found", body = ErrorResponse),
        (status = 422, description = "Invalid input or unknown reference", body = ErrorResponse)
    ),
    tag = "Notifications"
)]
#[instrument(skip(state))]
pub async fn update_notification(
    State(state): State<AppState>,
    Path(id): Path<NotificationId>,
    ValidatedJson(dto): ValidatedJson<UpdateNotificationDto>,
) -> Result<Json<Notification>, AppError> {
    let notification = NotificationService::update_notification(&state.db, id, dto).await?;
    Ok(Json(notification))
}

#[utoipa::path(
    delete,
    path = "/notifications/{id}",
    params(
        ("id" = i64, Path, description = "Notification ID")
    ),
    responses(
        (status = 204, description = "Notification deleted successfully"),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    ),
    tag = "Notifications"
)]
#[instrument(skip(state))]
pub async fn delete_notification(
    State(state): State<AppState>,
    Path(id): Path<NotificationId>,
) -> Result<StatusCode, AppError> {
    NotificationService::delete_notification(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Sets `read_at` once. Marking an already read notification keeps the
/// original timestamp.
#[utoipa::path(
    post,
    path = "/notifications/{id}/read",
    params(
        ("id" = i64, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification marked as read", body = Notification),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    ),
    tag = "Notifications"
)]
#[instrument(skip(state))]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Path(id): Path<NotificationId>,
) -> Result<Json<Notification>, AppError> {
    let notification = NotificationService::mark_as_read(&state.db, id).await?;
    Ok(Json(notification))
}
