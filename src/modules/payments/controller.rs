use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use tracing::instrument;

use edutrack_core::AppError;
use edutrack_models::ids::PaymentId;

use crate::docs::ErrorResponse;
use crate::modules::payments::model::{
    CreatePaymentDto, PaginatedPaymentsResponse, Payment, PaymentDetail, PaymentFilterParams,
    UpdatePaymentDto,
};
use crate::modules::payments::service::PaymentService;
use crate::state::AppState;
use crate::validator::{Path, Query, ValidatedJson};

#[utoipa::path(
    post,
    path = "/payments",
    request_body = CreatePaymentDto,
    responses(
        (status = 201, description = "Payment created successfully", body = Payment),
        (status = 422, description = "Invalid input or unknown reference", body = ErrorResponse)
    ),
    tag = "Payments"
)]
#[instrument(skip(state))]
pub async fn create_payment(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreatePaymentDto>,
) -> Result<(StatusCode, Json<Payment>), AppError> {
    let payment = PaymentService::create_payment(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

#[utoipa::path(
    get,
    path = "/payments",
    params(PaymentFilterParams),
    responses(
        (status = 200, description = "List of payments", body = PaginatedPaymentsResponse)
    ),
    tag = "Payments"
)]
#[instrument(skip(state))]
pub async fn get_payments(
    State(state): State<AppState>,
    Query(filters): Query<PaymentFilterParams>,
) -> Result<Json<PaginatedPaymentsResponse>, AppError> {
    let page = PaymentService::get_payments(&state.db, filters).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/payments/{id}",
    params(
        ("id" = i64, Path, description = "Payment ID")
    ),
    responses(
        (status = 200, description = "Payment", body = Payment),
        (status = 404, description = "Payment not found", body = ErrorResponse)
    ),
    tag = "Payments"
)]
#[instrument(skip(state))]
pub async fn get_payment_by_id(
    State(state): State<AppState>,
    Path(id): Path<PaymentId>,
) -> Result<Json<Payment>, AppError> {
    let payment = PaymentService::get_payment_by_id(&state.db, id).await?;
    Ok(Json(payment))
}

#[utoipa::path(
    get,
    path = "/payments/{id}/details",
    params(
        ("id" = i64, Path, description = "Payment ID")
    ),
    responses(
        (status = 200, description = "Payment with its student", body = PaymentDetail),
        (status = 404, description = "Payment not found", body = ErrorResponse)
    ),
    tag = "Payments"
)]
#[instrument(skip(state))]
pub async fn get_payment_details(
    State(state): State<AppState>,
    Path(id): Path<PaymentId>,
) -> Result<Json<PaymentDetail>, AppError> {
    let detail = PaymentService::get_payment_detail(&state.db, id).await?;
    Ok(Json(detail))
}

#[utoipa::path(
    method(put, patch),
    path = "/payments/{id}",
    params(
        ("id" = i64, Path, description = "Payment ID")
    ),
    request_body = UpdatePaymentDto,
    responses(
        (status = 200, description = "Payment updated successfully", body = Payment),
        (status = 404, description = "Payment not found", body = ErrorResponse),
        (status = 422, description = "Invalid input or unknown reference", body = ErrorResponse)
    ),
    tag = "Payments"
)]
#[instrument(skip(state))]
pub async fn update_payment(
    State(state): State<AppState>,
    Path(id): Path<PaymentId>,
    ValidatedJson(dto): ValidatedJson<UpdatePaymentDto>,
) -> Result<Json<Payment>, AppError> {
    let payment = PaymentService::update_payment(&state.db, id, dto).await?;
    Ok(Json(payment))
}

#[utoipa::path(
    delete,
    path = "/payments/{id}",
    params(
        ("id" = i64, Path, description = "Payment ID")
    ),
    responses(
        (status = 204, description = "Payment deleted successfully"),
        (status = 404, description = "Payment not found", body = ErrorResponse)
    ),
    tag = "Payments"
)]
#[instrument(skip(state))]
pub async fn delete_payment(
    State(state): State<AppState>,
    Path(id): Path<PaymentId>,
) -> Result<StatusCode, AppError> {
    PaymentService::delete_payment(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
