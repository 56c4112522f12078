//! User domain models and DTOs.
//!
//! Users are login accounts. A user with the `teacher` or `parent` role may be
//! linked to one Teacher or Parent profile respectively.

use crate::ids::UserId;
use crate::parents::Parent;
use crate::teachers::Teacher;
use chrono::{DateTime, Utc};
use edutrack_core::serde::deserialize_optional_from_str;
use edutrack_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Teacher,
    Parent,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Teacher => "teacher",
            UserRole::Parent => "parent",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user account. The password hash is never part of this struct.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub role: UserRole,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateUserDto {
    #[validate(custom(function = "crate::validation::username_length"))]
    pub username: String,
    #[validate(length(min = 8, max = 128, message = "must be between 8 and 128 characters"))]
    pub password: String,
    pub role: UserRole,
    #[serde(default = "default_true")]
    #[schema(default = true)]
    pub is_active: bool,
}

/// All fields are optional; only provided fields are updated. A new password
/// is re-hashed before it is stored.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserDto {
    #[validate(custom(function = "crate::validation::username_length"))]
    pub username: Option<String>,
    #[validate(length(min = 8, max = 128, message = "must be between 8 and 128 characters"))]
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

/// A user together with the profiles linked to it.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    pub teacher_profile: Option<Teacher>,
    pub parent_profile: Option<Parent>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilterParams {
    pub role: Option<UserRole>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub is_active: Option<bool>,
    /// Case-insensitive username substring
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedUsersResponse {
    pub data: Vec<User>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_dto_validation() {
        let valid = CreateUserDto {
            username: "headmaster".to_string(),
            password: "password123".to_string(),
            role: UserRole::Admin,
            is_active: true,
        };
        assert!(valid.validate().is_ok());

        let short_username = CreateUserDto {
            username: "ab".to_string(),
            ..valid.clone()
        };
        assert!(short_username.validate().is_err());

        let short_password = CreateUserDto {
            password: "short".to_string(),
            ..valid
        };
        let errors = short_password.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_create_user_dto_defaults_active() {
        let dto: CreateUserDto = serde_json::from_str(
            r#"{"username":"mrs_koffi","password":"password123","role":"teacher"}"#,
        )
        .unwrap();
        assert!(dto.is_active);
        assert_eq!(dto.role, UserRole::Teacher);
    }

    #[test]
    fn test_create_user_dto_rejects_unknown_fields() {
        let result = serde_json::from_str::<CreateUserDto>(
            r#"{"username":"mrs_koffi","password":"password123","role":"teacher","is_admin":true}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_create_user_dto_rejects_unknown_role() {
        let result = serde_json::from_str::<CreateUserDto>(
            r#"{"username":"mrs_koffi","password":"password123","role":"janitor"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_update_user_dto_empty_is_valid() {
        assert!(UpdateUserDto::default().validate().is_ok());
    }

    #[test]
    fn test_user_role_serialization() {
        assert_eq!(serde_json::to_string(&UserRole::Parent).unwrap(), r#""parent""#);
        assert_eq!(UserRole::Teacher.to_string(), "teacher");
    }

    #[test]
    fn test_user_detail_flattens_user() {
        let now = Utc::now();
        let detail = UserDetail {
            user: User {
                id: UserId::new(4),
                username: "admin".to_string(),
                role: UserRole::Admin,
                is_active: true,
                last_login_at: None,
                created_at: now,
                updated_at: now,
            },
            teacher_profile: None,
            parent_profile: None,
        };
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["id"], 4);
        assert_eq!(value["username"], "admin");
        assert!(value["teacher_profile"].is_null());
    }
}
