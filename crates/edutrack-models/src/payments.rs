//! Payment domain models and DTOs.

use crate::ids::{ClassroomId, PaymentId, StudentId};
use crate::students::Student;
use chrono::{DateTime, NaiveDate, Utc};
use edutrack_core::serde::{deserialize_optional_from_str, deserialize_some};
use edutrack_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "payment_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    Inscription,
    Quarterly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    Check,
    Card,
    MobileMoney,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Inscription => "inscription",
            PaymentType::Quarterly => "quarterly",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Payment {
    pub id: PaymentId,
    pub student_id: StudentId,
    pub amount: f64,
    pub payment_type: PaymentType,
    pub payment_method: PaymentMethod,
    /// Set to the creation time unless corrected later
    pub payment_date: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,
    pub status: PaymentStatus,
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreatePaymentDto {
    pub student_id: StudentId,
    #[validate(range(exclusive_min = 0.0, message = "must be greater than 0"))]
    pub amount: f64,
    pub payment_type: PaymentType,
    pub payment_method: PaymentMethod,
    pub due_date: Option<NaiveDate>,
    /// Defaults to `pending`
    pub status: Option<PaymentStatus>,
    #[validate(length(max = 100))]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdatePaymentDto {
    pub student_id: Option<StudentId>,
    #[validate(range(exclusive_min = 0.0, message = "must be greater than 0"))]
    pub amount: Option<f64>,
    pub payment_type: Option<PaymentType>,
    pub payment_method: Option<PaymentMethod>,
    pub payment_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<NaiveDate>)]
    pub due_date: Option<Option<NaiveDate>>,
    pub status: Option<PaymentStatus>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    #[validate(length(max = 100))]
    pub reference: Option<Option<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentDetail {
    #[serde(flatten)]
    pub payment: Payment,
    pub student: Student,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaymentFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    #[param(value_type = Option<i64>)]
    pub student_id: Option<StudentId>,
    /// Only payments of students currently in this classroom
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    #[param(value_type = Option<i64>)]
    pub class_id: Option<ClassroomId>,
    pub status: Option<PaymentStatus>,
    pub payment_type: Option<PaymentType>,
    /// Due on or after this date
    pub due_from: Option<NaiveDate>,
    /// Due on or before this date
    pub due_to: Option<NaiveDate>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedPaymentsResponse {
    pub data: Vec<Payment>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_payment_dto_minimal_payload() {
        let dto: CreatePaymentDto = serde_json::from_str(
            r#"{"student_id":1,"amount":150.0,"payment_method":"cash","payment_type":"quarterly"}"#,
        )
        .unwrap();
        assert_eq!(dto.student_id, StudentId::new(1));
        assert_eq!(dto.payment_method, PaymentMethod::Cash);
        assert_eq!(dto.payment_type, PaymentType::Quarterly);
        assert_eq!(dto.status, None);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_payment_dto_amount_must_be_positive() {
        for amount in [0.0, -10.0] {
            let dto = CreatePaymentDto {
                student_id: StudentId::new(1),
                amount,
                payment_type: PaymentType::Inscription,
                payment_method: PaymentMethod::BankTransfer,
                due_date: None,
                status: None,
                reference: None,
            };
            let errors = dto.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("amount"));
        }
    }

    #[test]
    fn test_payment_method_wire_names() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::MobileMoney).unwrap(),
            r#""mobile_money""#
        );
        assert_eq!(
            serde_json::from_str::<PaymentMethod>(r#""bank_transfer""#).unwrap(),
            PaymentMethod::BankTransfer
        );
        assert!(serde_json::from_str::<PaymentMethod>(r#""bitcoin""#).is_err());
    }

    #[test]
    fn test_filter_params_due_range() {
        let params: PaymentFilterParams =
            serde_json::from_str(r#"{"due_from":"2025-01-01","due_to":"2025-03-31","status":"overdue"}"#)
                .unwrap();
        assert_eq!(params.due_from, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(params.due_to, NaiveDate::from_ymd_opt(2025, 3, 31));
        assert_eq!(params.status, Some(PaymentStatus::Overdue));
    }
}
