//! Level domain models and DTOs.
//!
//! A level is a year group ("CP", "CE1", "6eme"...). Classrooms belong to
//! exactly one level.

use crate::classrooms::Classroom;
use crate::ids::LevelId;
use chrono::{DateTime, Utc};
use edutrack_core::serde::deserialize_some;
use edutrack_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Level {
    pub id: LevelId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateLevelDto {
    #[validate(
        length(min = 1, max = 100),
        custom(function = "crate::validation::not_blank")
    )]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateLevelDto {
    #[validate(
        length(min = 1, max = 100),
        custom(function = "crate::validation::not_blank")
    )]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LevelDetail {
    #[serde(flatten)]
    pub level: Level,
    pub classrooms: Vec<Classroom>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LevelFilterParams {
    /// Case-insensitive name substring
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedLevelsResponse {
    pub data: Vec<Level>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_level_dto_validation() {
        let valid_dto = CreateLevelDto {
            name: "Grade 1".to_string(),
            description: Some("First grade".to_string()),
        };
        assert!(valid_dto.validate().is_ok());

        let empty_name = CreateLevelDto {
            name: "".to_string(),
            description: None,
        };
        assert!(empty_name.validate().is_err());

        let long_name = CreateLevelDto {
            name: "x".repeat(101),
            description: None,
        };
        assert!(long_name.validate().is_err());
    }

    #[test]
    fn test_update_level_dto_validation() {
        let valid_dto = UpdateLevelDto {
            name: Some("Updated Grade".to_string()),
            description: Some(Some("Updated description".to_string())),
        };
        assert!(valid_dto.validate().is_ok());

        assert!(UpdateLevelDto::default().validate().is_ok());
    }

    #[test]
    fn test_update_level_dto_rejects_unknown_fields() {
        let result = serde_json::from_str::<UpdateLevelDto>(r#"{"school_id":1}"#);
        assert!(result.is_err());
    }
}
