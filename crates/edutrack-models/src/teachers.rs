//! Teacher domain models and DTOs.

use crate::classrooms::Classroom;
use crate::ids::{TeacherId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use edutrack_core::serde::{deserialize_optional_from_str, deserialize_some};
use edutrack_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Teacher {
    pub id: TeacherId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specialty: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateTeacherDto {
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
    #[validate(length(max = 100))]
    pub specialty: Option<String>,
    #[validate(custom(function = "crate::validation::not_in_future"))]
    pub hire_date: Option<NaiveDate>,
    /// Account to link; must have the `teacher` role
    pub user_id: Option<UserId>,
}

/// Absent fields are left untouched; `null` clears a nullable field.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateTeacherDto {
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
    #[validate(length(max = 100))]
    pub specialty: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<NaiveDate>)]
    #[validate(custom(function = "crate::validation::not_in_future"))]
    pub hire_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i64>)]
    pub user_id: Option<Option<UserId>>,
}

/// A teacher together with the classrooms they are assigned to.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct TeacherDetail {
    #[serde(flatten)]
    pub teacher: Teacher,
    pub classrooms: Vec<Classroom>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TeacherFilterParams {
    /// Case-insensitive match on first or last name
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    #[param(value_type = Option<i64>)]
    pub user_id: Option<UserId>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedTeachersResponse {
    pub data: Vec<Teacher>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dto() -> CreateTeacherDto {
        CreateTeacherDto {
            first_name: "Kwame".to_string(),
            last_name: "Mensah".to_string(),
            email: Some("k.mensah@example.com".to_string()),
            phone: None,
            specialty: Some("Mathematics".to_string()),
            hire_date: NaiveDate::from_ymd_opt(2019, 9, 1),
            user_id: None,
        }
    }

    #[test]
    fn test_create_teacher_dto_validation() {
        assert!(valid_dto().validate().is_ok());

        let future_hire = CreateTeacherDto {
            hire_date: Some(Utc::now().date_naive() + chrono::Duration::days(30)),
            ..valid_dto()
        };
        let errors = future_hire.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("hire_date"));
    }

    #[test]
    fn test_create_teacher_dto_missing_last_name_fails_to_parse() {
        let result = serde_json::from_str::<CreateTeacherDto>(r#"{"first_name":"Kwame"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_teacher_dto_partial() {
        let dto: UpdateTeacherDto =
            serde_json::from_str(r#"{"specialty":"Physics","hire_date":null}"#).unwrap();
        assert_eq!(dto.specialty, Some(Some("Physics".to_string())));
        assert_eq!(dto.hire_date, Some(None));
        assert_eq!(dto.first_name, None);
        assert!(dto.validate().is_ok());
    }
}
