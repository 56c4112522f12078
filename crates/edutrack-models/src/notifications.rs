//! Notification domain models and DTOs.

use crate::ids::{NotificationId, UserId};
use chrono::{DateTime, Utc};
use edutrack_core::serde::{deserialize_optional_from_str, deserialize_some};
use edutrack_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(type_name = "notification_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    #[default]
    Info,
    PaymentReminder,
    Absence,
    Grade,
    Alert,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Info => "info",
            NotificationType::PaymentReminder => "payment_reminder",
            NotificationType::Absence => "absence",
            NotificationType::Grade => "grade",
            NotificationType::Alert => "alert",
        }
    }
}

/// A message addressed to a user. Notifications have no `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient_id: UserId,
    pub message: String,
    pub notification_type: NotificationType,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateNotificationDto {
    pub recipient_id: UserId,
    #[validate(
        length(min = 1, max = 2000),
        custom(function = "crate::validation::not_blank")
    )]
    pub message: String,
    /// Defaults to `info`
    pub notification_type: Option<NotificationType>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateNotificationDto {
    #[validate(
        length(min = 1, max = 2000),
        custom(function = "crate::validation::not_blank")
    )]
    pub message: Option<String>,
    pub notification_type: Option<NotificationType>,
    /// `null` marks the notification unread again
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub read_at: Option<Option<DateTime<Utc>>>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NotificationFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    #[param(value_type = Option<i64>)]
    pub recipient_id: Option<UserId>,
    pub notification_type: Option<NotificationType>,
    /// `true` for unread only, `false` for read only
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub unread: Option<bool>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedNotificationsResponse {
    pub data: Vec<Notification>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_notification_dto_validation() {
        let dto: CreateNotificationDto = serde_json::from_str(
            r#"{"recipient_id":2,"message":"Term fees are due on Friday","notification_type":"payment_reminder"}"#,
        )
        .unwrap();
        assert_eq!(dto.notification_type, Some(NotificationType::PaymentReminder));
        assert!(dto.validate().is_ok());

        let empty = CreateNotificationDto {
            message: String::new(),
            ..dto
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_update_notification_dto_mark_unread() {
        let dto: UpdateNotificationDto = serde_json::from_str(r#"{"read_at":null}"#).unwrap();
        assert_eq!(dto.read_at, Some(None));
    }

    #[test]
    fn test_filter_params_unread_flag() {
        let params: NotificationFilterParams =
            serde_json::from_str(r#"{"unread":"true","recipient_id":"7"}"#).unwrap();
        assert_eq!(params.unread, Some(true));
        assert_eq!(params.recipient_id, Some(UserId::new(7)));
    }
}
