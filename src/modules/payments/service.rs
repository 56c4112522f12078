use anyhow::anyhow;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument};

use edutrack_core::{AppError, PaginationMeta};
use edutrack_models::ids::PaymentId;
use edutrack_observability::track_payment_recorded;

use crate::modules::payments::model::{
    CreatePaymentDto, PaginatedPaymentsResponse, Payment, PaymentDetail, PaymentFilterParams,
    UpdatePaymentDto,
};
use crate::modules::students::service::StudentService;
use crate::utils::references::{Reference, ensure_exists};

const PAYMENT_COLUMNS: &str = "id, student_id, amount, payment_type, payment_method, \
     payment_date, due_date, status, reference, created_at, updated_at";

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &PaymentFilterParams) {
    builder.push(" WHERE TRUE");
    if let Some(student_id) = filters.student_id {
        builder.push(" AND student_id = ").push_bind(student_id);
    }
    if let Some(class_id) = filters.class_id {
        builder
            .push(" AND student_id IN (SELECT id FROM students WHERE class_id = ")
            .push_bind(class_id)
            .push(")");
    }
    if let Some(status) = filters.status {
        builder.push(" AND status = ").push_bind(status);
    }
    if let Some(payment_type) = filters.payment_type {
        builder.push(" AND payment_type = ").push_bind(payment_type);
    }
    if let Some(due_from) = filters.due_from {
        builder.push(" AND due_date >= ").push_bind(due_from);
    }
    if let Some(due_to) = filters.due_to {
        builder.push(" AND due_date <= ").push_bind(due_to);
    }
}

pub struct PaymentService;

impl PaymentService {
    /// Records a payment. `payment_date` is set to now and `status` defaults
    /// to `pending`.
    #[instrument]
    pub async fn create_payment(db: &PgPool, dto: CreatePaymentDto) -> Result<Payment, AppError> {
        ensure_exists(db, Reference::Student, dto.student_id.into_inner(), "student_id").await?;

        let payment = sqlx::query_as::<_, Payment>(&format!(
            r#"INSERT INTO payments
                   (student_id, amount, payment_type, payment_method, due_date, status, reference)
               VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'pending'::payment_status), $7)
               RETURNING {PAYMENT_COLUMNS}"#
        ))
        .bind(dto.student_id)
        .bind(dto.amount)
        .bind(dto.payment_type)
        .bind(dto.payment_method)
        .bind(dto.due_date)
        .bind(dto.status)
        .bind(&dto.reference)
        .fetch_one(db)
        .await?;

        track_payment_recorded(payment.payment_type.as_str(), payment.amount);
        info!(
            payment_id = %payment.id,
            student_id = %payment.student_id,
            amount = payment.amount,
            "Payment recorded"
        );

        Ok(payment)
    }

    #[instrument]
    pub async fn get_payments(
        db: &PgPool,
        filters: PaymentFilterParams,
    ) -> Result<PaginatedPaymentsResponse, AppError> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM payments");
        push_filters(&mut count_query, &filters);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(db)
            .await?;

        let mut data_query = QueryBuilder::new(format!("SELECT {PAYMENT_COLUMNS} FROM payments"));
        push_filters(&mut data_query, &filters);
        data_query
            .push(" ORDER BY id ASC LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.skip());
        let payments = data_query.build_query_as::<Payment>().fetch_all(db).await?;

        Ok(PaginatedPaymentsResponse {
            data: payments,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument]
    pub async fn get_payment_by_id(db: &PgPool, id: PaymentId) -> Result<Payment, AppError> {
        sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Payment {} not found", id)))
    }

    #[instrument]
    pub async fn get_payment_detail(db: &PgPool, id: PaymentId) -> Result<PaymentDetail, AppError> {
        let payment = Self::get_payment_by_id(db, id).await?;
        let student = StudentService::get_student_by_id(db, payment.student_id).await?;

        Ok(PaymentDetail { payment, student })
    }

    #[instrument]
    pub async fn update_payment(
        db: &PgPool,
        id: PaymentId,
        dto: UpdatePaymentDto,
    ) -> Result<Payment, AppError> {
        let existing = Self::get_payment_by_id(db, id).await?;

        if let Some(student_id) = dto.student_id {
            ensure_exists(db, Reference::Student, student_id.into_inner(), "student_id").await?;
        }

        let student_id = dto.student_id.unwrap_or(existing.student_id);
        let amount = dto.amount.unwrap_or(existing.amount);
        let payment_type = dto.payment_type.unwrap_or(existing.payment_type);
        let payment_method = dto.payment_method.unwrap_or(existing.payment_method);
        let payment_date = dto.payment_date.unwrap_or(existing.payment_date);
        let due_date = dto.due_date.unwrap_or(existing.due_date);
        let status = dto.status.unwrap_or(existing.status);
        let reference = dto.reference.unwrap_or(existing.reference);

        let payment = sqlx::query_as::<_, Payment>(&format!(
            r#"UPDATE payments
               SET student_id = $1, amount = $2, payment_type = $3, payment_method = $4,
                   payment_date = $5, due_date = $6, status = $7, reference = $8,
                   updated_at = NOW()
               WHERE id = $9
               RETURNING {PAYMENT_COLUMNS}"#
        ))
        .bind(student_id)
        .bind(amount)
        .bind(payment_type)
        .bind(payment_method)
        .bind(payment_date)
        .bind(due_date)
        .bind(status)
        .bind(&reference)
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(payment)
    }

    #[instrument]
    pub async fn delete_payment(db: &PgPool, id: PaymentId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Payment {} not found", id)));
        }
        Ok(())
    }
}
