//! Parent domain models and DTOs.

use crate::ids::{ParentId, UserId};
use crate::students::Student;
use chrono::{DateTime, Utc};
use edutrack_core::serde::{deserialize_optional_from_str, deserialize_some};
use edutrack_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// A parent or guardian. Students reference exactly one parent.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Parent {
    pub id: ParentId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateParentDto {
    #[validate(
        length(min = 1, max = 100),
        custom(function = "crate::validation::not_blank")
    )]
    pub first_name: String,
    #[validate(
        length(min = 1, max = 100),
        custom(function = "crate::validation::not_blank")
    )]
    pub last_name: String,
    #[validate(
        email(message = "must be a valid email address"),
        length(max = 255, message = "must be at most 255 characters")
    )]
    pub email: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Account to link; must have the `parent` role
    pub user_id: Option<UserId>,
}

/// Absent fields are left untouched; `null` clears a nullable field.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateParentDto {
    #[validate(
        length(min = 1, max = 100),
        custom(function = "crate::validation::not_blank")
    )]
    pub first_name: Option<String>,
    #[validate(
        length(min = 1, max = 100),
        custom(function = "crate::validation::not_blank")
    )]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    #[validate(
        email(message = "must be a valid email address"),
        length(max = 255, message = "must be at most 255 characters")
    )]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    #[validate(length(max = 30))]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i64>)]
    pub user_id: Option<Option<UserId>>,
}

/// A parent together with their children.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ParentDetail {
    #[serde(flatten)]
    pub parent: Parent,
    pub students: Vec<Student>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ParentFilterParams {
    /// Case-insensitive match on first or last name
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    #[param(value_type = Option<i64>)]
    pub user_id: Option<UserId>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedParentsResponse {
    pub data: Vec<Parent>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dto() -> CreateParentDto {
        CreateParentDto {
            first_name: "Fatou".to_string(),
            last_name: "Sow".to_string(),
            email: Some("fatou.sow@example.com".to_string()),
            phone: Some("+221 77 000 00 00".to_string()),
            address: None,
            user_id: None,
        }
    }

    #[test]
    fn test_create_parent_dto_validation() {
        assert!(valid_dto().validate().is_ok());

        let bad_email = CreateParentDto {
            email: Some("not-an-email".to_string()),
            ..valid_dto()
        };
        let errors = bad_email.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));

        let blank_name = CreateParentDto {
            first_name: "   ".to_string(),
            ..valid_dto()
        };
        assert!(blank_name.validate().is_err());
    }

    #[test]
    fn test_update_parent_dto_null_clears_field() {
        let dto: UpdateParentDto = serde_json::from_str(r#"{"phone":null}"#).unwrap();
        assert_eq!(dto.phone, Some(None));
        assert_eq!(dto.email, None);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_update_parent_dto_validates_present_email() {
        let dto: UpdateParentDto = serde_json::from_str(r#"{"email":"nope"}"#).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_email_longer_than_column_is_rejected() {
        let label = "b".repeat(60);
        let dto = CreateParentDto {
            email: Some(format!("{0}@{0}.{0}.{0}.{0}.sn", label)),
            ..valid_dto()
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));

        let update = UpdateParentDto {
            email: dto.email.map(Some),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
