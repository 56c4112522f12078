//! Attendance domain models and DTOs.
//!
//! One record per student per day.

use crate::ids::{AttendanceId, ClassroomId, StudentId};
use chrono::{DateTime, NaiveDate, Utc};
use edutrack_core::serde::{deserialize_optional_from_str, deserialize_some};
use edutrack_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "attendance_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
            AttendanceStatus::Excused => "excused",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Attendance {
    pub id: AttendanceId,
    pub student_id: StudentId,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateAttendanceDto {
    pub student_id: StudentId,
    /// Defaults to today
    #[validate(custom(function = "crate::validation::not_in_future"))]
    pub date: Option<NaiveDate>,
    pub status: AttendanceStatus,
    #[validate(length(max = 500))]
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateAttendanceDto {
    #[validate(custom(function = "crate::validation::not_in_future"))]
    pub date: Option<NaiveDate>,
    pub status: Option<AttendanceStatus>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    #[validate(length(max = 500))]
    pub remark: Option<Option<String>>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    #[param(value_type = Option<i64>)]
    pub student_id: Option<StudentId>,
    /// Only records of students currently in this classroom
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    #[param(value_type = Option<i64>)]
    pub class_id: Option<ClassroomId>,
    pub status: Option<AttendanceStatus>,
    /// On or after this date
    pub date_from: Option<NaiveDate>,
    /// On or before this date
    pub date_to: Option<NaiveDate>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedAttendanceResponse {
    pub data: Vec<Attendance>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_attendance_dto_defaults_date() {
        let dto: CreateAttendanceDto =
            serde_json::from_str(r#"{"student_id":3,"status":"late"}"#).unwrap();
        assert_eq!(dto.date, None);
        assert_eq!(dto.status, AttendanceStatus::Late);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_attendance_dto_future_date() {
        let dto = CreateAttendanceDto {
            student_id: StudentId::new(3),
            date: Some(Utc::now().date_naive() + chrono::Duration::days(7)),
            status: AttendanceStatus::Present,
            remark: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_attendance_dto_does_not_move_records() {
        let result = serde_json::from_str::<UpdateAttendanceDto>(r#"{"student_id":4}"#);
        assert!(result.is_err());
    }
}
