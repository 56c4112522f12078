use anyhow::anyhow;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use edutrack_core::{AppError, PaginationMeta};
use edutrack_models::ids::NotificationId;
use edutrack_observability::track_notification_created;

use crate::modules::notifications::model::{
    CreateNotificationDto, Notification, NotificationFilterParams, PaginatedNotificationsResponse,
    UpdateNotificationDto,
};
use crate::utils::references::{Reference, ensure_exists};

const NOTIFICATION_COLUMNS: &str =
    "id, recipient_id, message, notification_type, read_at, created_at";

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &NotificationFilterParams) {
    builder.push(" WHERE TRUE");
    if let Some(recipient_id) = filters.recipient_id {
        builder.push(" AND recipient_id = ").push_bind(recipient_id);
    }
    if let Some(notification_type) = filters.notification_type {
        builder
            .push(" AND notification_type = ")
            .push_bind(notification_type);
    }
    match filters.unread {
        Some(true) => {
            builder.push(" AND read_at IS NULL");
        }
        Some(false) => {
            builder.push(" AND read_at IS NOT NULL");
        }
        None => {}
    }
}

pub struct NotificationService;

impl NotificationService {
    #[instrument]
    pub async fn create_notification(
        db: &PgPool,
        dto: CreateNotificationDto,
    ) -> Result<Notification, AppError> {
        ensure_exists(db, Reference::User, dto.recipient_id.into_inner(), "recipient_id").await?;

        let notification = sqlx::query_as::<_, Notification>(&format!(
            r#"INSERT INTO notifications (recipient_id, message, notification_type)
               VALUES ($1, $2, COALESCE($3, 'info'::notification_type))
               RETURNING {NOTIFICATION_COLUMNS}"#
        ))
        .bind(dto.recipient_id)
        .bind(dto.message.trim())
        .bind(dto.notification_type)
        .fetch_one(db)
        .await?;

        track_notification_created(notification.notification_type.as_str());
        Ok(notification)
    }

    /// Newest first.
    #[instrument]
    pub async fn get_notifications(
        db: &PgPool,
        filters: NotificationFilterParams,
    ) -> Result<PaginatedNotificationsResponse, AppError> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM notifications");
        push_filters(&mut count_query, &filters);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(db)
            .await?;

        let mut data_query =
            QueryBuilder::new(format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications"));
        push_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.skip());
        let notifications = data_query
            .build_query_as::<Notification>()
            .fetch_all(db)
            .await?;

        Ok(PaginatedNotificationsResponse {
            data: notifications,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument]
    pub async fn get_notification_by_id(
        db: &PgPool,
        id: NotificationId,
    ) -> Result<Notification, AppError> {
        sqlx::query_as::<_, Notification>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Notification {} not found", id)))
    }

    #[instrument]
    pub async fn update_notification(
        db: &PgPool,
        id: NotificationId,
        dto: UpdateNotificationDto,
    ) -> Result<Notification, AppError> {
        let existing = Self::get_notification_by_id(db, id).await?;

        let message = dto
            .message
            .map(|m| m.trim().to_string())
            .unwrap_or(existing.message);
        let notification_type = dto.notification_type.unwrap_or(existing.notification_type);
        let read_at = dto.read_at.unwrap_or(existing.read_at);

        let notification = sqlx::query_as::<_, Notification>(&format!(
            r#"UPDATE notifications
               SET message = $1, notification_type = $2, read_at = $3
               WHERE id = $4
               RETURNING {NOTIFICATION_COLUMNS}"#
        ))
        .bind(&message)
        .bind(notification_type)
        .bind(read_at)
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(notification)
    }

    #[instrument]
    pub async fn mark_as_read(db: &PgPool, id: NotificationId) -> Result<Notification, AppError> {
        sqlx::query_as::<_, Notification>(&format!(
            r#"UPDATE notifications
               SET read_at = COALESCE(read_at, NOW())
               WHERE id = $1
               RETURNING {NOTIFICATION_COLUMNS}"#
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Notification {} not found", id)))
    }

    #[instrument]
    pub async fn delete_notification(db: &PgPool, id: NotificationId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Notification {} not found", id)));
        }
        Ok(())
    }
}
