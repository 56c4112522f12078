//! Student domain models and DTOs.
//!
//! Every student belongs to one parent and one classroom. Grades, payments
//! and attendance records hang off the student and are removed with it.

use crate::classrooms::Classroom;
use crate::ids::{ClassroomId, ParentId, StudentId};
use crate::parents::Parent;
use chrono::{DateTime, NaiveDate, Utc};
use edutrack_core::serde::deserialize_optional_from_str;
use edutrack_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "gender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(type_name = "enrollment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    #[default]
    Enrolled,
    Suspended,
    Graduated,
    Withdrawn,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Student {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub enrollment_status: EnrollmentStatus,
    pub enrollment_date: NaiveDate,
    pub parent_id: ParentId,
    pub class_id: ClassroomId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for enrolling a new student.
///
/// `enrollment_status` defaults to `enrolled` and `enrollment_date` to today.
#[derive(Deserialize, Debug, Clone, ToSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateStudentDto {
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
    #[validate(custom(function = "crate::validation::not_in_future"))]
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub enrollment_status: Option<EnrollmentStatus>,
    pub enrollment_date: Option<NaiveDate>,
    pub parent_id: ParentId,
    pub class_id: ClassroomId,
}

/// DTO for updating an existing student.
///
/// All fields are optional; only provided fields will be updated. Moving a
/// student to another classroom is a `class_id` update.
#[derive(Deserialize, Debug, Clone, Default, ToSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateStudentDto {
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
    #[validate(custom(function = "crate::validation::not_in_future"))]
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub enrollment_status: Option<EnrollmentStatus>,
    pub enrollment_date: Option<NaiveDate>,
    pub parent_id: Option<ParentId>,
    pub class_id: Option<ClassroomId>,
}

/// A student with their parent and classroom.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct StudentDetail {
    #[serde(flatten)]
    pub student: Student,
    pub parent: Parent,
    pub classroom: Classroom,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    #[param(value_type = Option<i64>)]
    pub parent_id: Option<ParentId>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    #[param(value_type = Option<i64>)]
    pub class_id: Option<ClassroomId>,
    pub gender: Option<Gender>,
    pub enrollment_status: Option<EnrollmentStatus>,
    /// Case-insensitive match on first or last name
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub data: Vec<Student>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dto() -> CreateStudentDto {
        CreateStudentDto {
            first_name: "Amina".to_string(),
            last_name: "Diallo".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2015, 4, 2).unwrap(),
            gender: Gender::Female,
            enrollment_status: None,
            enrollment_date: None,
            parent_id: ParentId::new(1),
            class_id: ClassroomId::new(1),
        }
    }

    #[test]
    fn test_create_student_dto_validation() {
        assert!(valid_dto().validate().is_ok());
    }

    #[test]
    fn test_create_student_dto_future_birth_date() {
        let dto = CreateStudentDto {
            birth_date: Utc::now().date_naive() + chrono::Duration::days(1),
            ..valid_dto()
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("birth_date"));
    }

    #[test]
    fn test_create_student_dto_empty_name() {
        let dto = CreateStudentDto {
            first_name: "".to_string(),
            ..valid_dto()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_student_dto_rejects_unknown_gender() {
        let json = r#"{
            "first_name": "Amina",
            "last_name": "Diallo",
            "birth_date": "2015-04-02",
            "gender": "other",
            "parent_id": 1,
            "class_id": 1
        }"#;
        assert!(serde_json::from_str::<CreateStudentDto>(json).is_err());
    }

    #[test]
    fn test_create_student_dto_rejects_string_ids() {
        let json = r#"{
            "first_name": "Amina",
            "last_name": "Diallo",
            "birth_date": "2015-04-02",
            "gender": "female",
            "parent_id": "one",
            "class_id": 1
        }"#;
        assert!(serde_json::from_str::<CreateStudentDto>(json).is_err());
    }

    #[test]
    fn test_enrollment_status_default() {
        assert_eq!(EnrollmentStatus::default(), EnrollmentStatus::Enrolled);
        assert_eq!(
            serde_json::to_string(&EnrollmentStatus::Withdrawn).unwrap(),
            r#""withdrawn""#
        );
    }

    #[test]
    fn test_filter_params_parse_enums() {
        let params: StudentFilterParams =
            serde_json::from_str(r#"{"gender":"male","class_id":"2","enrollment_status":"suspended"}"#)
                .unwrap();
        assert_eq!(params.gender, Some(Gender::Male));
        assert_eq!(params.class_id, Some(ClassroomId::new(2)));
        assert_eq!(params.enrollment_status, Some(EnrollmentStatus::Suspended));
    }
}
