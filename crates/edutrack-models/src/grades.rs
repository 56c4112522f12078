//! Grade domain models and DTOs.
//!
//! A grade is one score out of 100 for a student in a subject and term.
//! `(student_id, subject_id, term)` is unique.

use crate::ids::{ClassroomId, GradeId, StudentId, SubjectId};
use crate::students::Student;
use crate::subjects::Subject;
use chrono::{DateTime, Utc};
use edutrack_core::serde::{deserialize_optional_from_str, deserialize_some};
use edutrack_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "term", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Term {
    First,
    Second,
    Third,
}

impl Term {
    pub fn as_str(&self) -> &'static str {
        match self {
            Term::First => "first",
            Term::Second => "second",
            Term::Third => "third",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Grade {
    pub id: GradeId,
    pub student_id: StudentId,
    pub subject_id: SubjectId,
    pub term: Term,
    pub score: f64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateGradeDto {
    pub student_id: StudentId,
    pub subject_id: SubjectId,
    pub term: Term,
    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub score: f64,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateGradeDto {
    pub student_id: Option<StudentId>,
    pub subject_id: Option<SubjectId>,
    pub term: Option<Term>,
    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub comment: Option<Option<String>>,
}

/// A grade with the student and subject it refers to.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GradeDetail {
    #[serde(flatten)]
    pub grade: Grade,
    pub student: Student,
    pub subject: Subject,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GradeFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    #[param(value_type = Option<i64>)]
    pub student_id: Option<StudentId>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    #[param(value_type = Option<i64>)]
    pub subject_id: Option<SubjectId>,
    pub term: Option<Term>,
    /// Only grades of students currently in this classroom
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    #[param(value_type = Option<i64>)]
    pub class_id: Option<ClassroomId>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedGradesResponse {
    pub data: Vec<Grade>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dto() -> CreateGradeDto {
        CreateGradeDto {
            student_id: StudentId::new(1),
            subject_id: SubjectId::new(1),
            term: Term::First,
            score: 87.5,
            comment: Some("Good progress".to_string()),
        }
    }

    #[test]
    fn test_create_grade_dto_score_bounds() {
        assert!(valid_dto().validate().is_ok());

        for score in [0.0, 100.0] {
            let dto = CreateGradeDto {
                score,
                ..valid_dto()
            };
            assert!(dto.validate().is_ok(), "score {} should be valid", score);
        }

        for score in [-0.5, 100.1] {
            let dto = CreateGradeDto {
                score,
                ..valid_dto()
            };
            let errors = dto.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("score"));
        }
    }

    #[test]
    fn test_create_grade_dto_rejects_unknown_term() {
        let json = r#"{"student_id":1,"subject_id":1,"term":"fourth","score":10}"#;
        assert!(serde_json::from_str::<CreateGradeDto>(json).is_err());
    }

    #[test]
    fn test_update_grade_dto_score_bounds() {
        let dto = UpdateGradeDto {
            score: Some(120.0),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }
}
