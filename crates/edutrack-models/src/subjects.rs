//! Subject domain models and DTOs.

use crate::ids::SubjectId;
use chrono::{DateTime, Utc};
use edutrack_core::serde::deserialize_some;
use edutrack_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateSubjectDto {
    #[validate(
        length(min = 1, max = 100),
        custom(function = "crate::validation::not_blank")
    )]
    pub name: String,
    /// Short unique code, e.g. `MATH`
    #[validate(length(min = 1, max = 20))]
    pub code: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateSubjectDto {
    #[validate(
        length(min = 1, max = 100),
        custom(function = "crate::validation::not_blank")
    )]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    #[validate(length(min = 1, max = 20))]
    pub code: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SubjectFilterParams {
    /// Case-insensitive match on name or code
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedSubjectsResponse {
    pub data: Vec<Subject>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_subject_dto_validation() {
        let valid = CreateSubjectDto {
            name: "Mathematics".to_string(),
            code: Some("MATH".to_string()),
            description: None,
        };
        assert!(valid.validate().is_ok());

        let long_code = CreateSubjectDto {
            code: Some("X".repeat(21)),
            ..valid
        };
        assert!(long_code.validate().is_err());
    }

    #[test]
    fn test_update_subject_dto_clear_code() {
        let dto: UpdateSubjectDto = serde_json::from_str(r#"{"code":null}"#).unwrap();
        assert_eq!(dto.code, Some(None));
        assert!(dto.validate().is_ok());
    }
}
