//! Classroom domain models and DTOs.

use crate::ids::{ClassroomId, LevelId, TeacherId};
use crate::levels::Level;
use crate::students::Student;
use crate::teachers::Teacher;
use chrono::{DateTime, Utc};
use edutrack_core::serde::{deserialize_optional_from_str, deserialize_some};
use edutrack_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub const MAX_CAPACITY: i32 = 200;

/// A class group within a level. `(level_id, name)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Classroom {
    pub id: ClassroomId,
    pub name: String,
    pub capacity: i32,
    pub schedule: Option<String>,
    pub level_id: LevelId,
    pub teacher_id: Option<TeacherId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateClassroomDto {
    #[validate(
        length(min = 1, max = 100),
        custom(function = "crate::validation::not_blank")
    )]
    pub name: String,
    #[validate(range(min = 1, max = 200, message = "must be between 1 and 200"))]
    pub capacity: i32,
    pub schedule: Option<String>,
    pub level_id: LevelId,
    pub teacher_id: Option<TeacherId>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateClassroomDto {
    #[validate(
        length(min = 1, max = 100),
        custom(function = "crate::validation::not_blank")
    )]
    pub name: Option<String>,
    #[validate(range(min = 1, max = 200, message = "must be between 1 and 200"))]
    pub capacity: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub schedule: Option<Option<String>>,
    pub level_id: Option<LevelId>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i64>)]
    pub teacher_id: Option<Option<TeacherId>>,
}

/// A classroom with its level, its teacher and the students enrolled in it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClassroomDetail {
    #[serde(flatten)]
    pub classroom: Classroom,
    pub level: Level,
    pub teacher: Option<Teacher>,
    pub student_count: i64,
    pub students: Vec<Student>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClassroomFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    #[param(value_type = Option<i64>)]
    pub level_id: Option<LevelId>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    #[param(value_type = Option<i64>)]
    pub teacher_id: Option<TeacherId>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedClassroomsResponse {
    pub data: Vec<Classroom>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dto() -> CreateClassroomDto {
        CreateClassroomDto {
            name: "CM2 A".to_string(),
            capacity: 30,
            schedule: Some("Mon-Fri 08:00-12:00".to_string()),
            level_id: LevelId::new(1),
            teacher_id: None,
        }
    }

    #[test]
    fn test_create_classroom_dto_validation() {
        assert!(valid_dto().validate().is_ok());

        let zero_capacity = CreateClassroomDto {
            capacity: 0,
            ..valid_dto()
        };
        let errors = zero_capacity.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("capacity"));

        let oversized = CreateClassroomDto {
            capacity: MAX_CAPACITY + 1,
            ..valid_dto()
        };
        assert!(oversized.validate().is_err());
    }

    #[test]
    fn test_create_classroom_dto_requires_level() {
        let result =
            serde_json::from_str::<CreateClassroomDto>(r#"{"name":"CM2 A","capacity":30}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_classroom_dto_unassign_teacher() {
        let dto: UpdateClassroomDto = serde_json::from_str(r#"{"teacher_id":null}"#).unwrap();
        assert_eq!(dto.teacher_id, Some(None));
        assert_eq!(dto.level_id, None);
    }

    #[test]
    fn test_filter_params_parse_ids_from_query_strings() {
        let params: ClassroomFilterParams =
            serde_json::from_str(r#"{"level_id":"3","limit":"5"}"#).unwrap();
        assert_eq!(params.level_id, Some(LevelId::new(3)));
        assert_eq!(params.teacher_id, None);
        assert_eq!(params.pagination.limit(), 5);
    }
}
