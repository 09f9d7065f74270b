use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use schoolbook_core::AppError;
use schoolbook_models::ids::InvoiceId;

use crate::modules::payments::model::{CreatePaymentDto, Payment, PaymentReceipt};
use crate::modules::payments::service::PaymentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Record a payment against an invoice
///
/// The amount may not exceed the outstanding balance. A payment that clears
/// the balance marks the invoice as paid.
#[utoipa::path(
    post,
    path = "/api/invoices/{id}/payments",
    summary = "Record payment",
    params(
        ("id" = Uuid, Path, description = "Invoice ID")
    ),
    request_body = CreatePaymentDto,
    responses(
        (status = 201, description = "Payment recorded", body = PaymentReceipt),
        (status = 400, description = "Malformed body or unknown payment method"),
        (status = 404, description = "Invoice not found"),
        (status = 422, description = "Invoice already paid or amount exceeds balance")
    ),
    tag = "Payments"
)]
#[instrument(skip(state))]
pub async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreatePaymentDto>,
) -> Result<(StatusCode, Json<PaymentReceipt>), AppError> {
    let receipt = PaymentService::record_payment(&state.db, InvoiceId::from(id), dto).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// List payments for an invoice
#[utoipa::path(
    get,
    path = "/api/invoices/{id}/payments",
    summary = "List payments",
    params(
        ("id" = Uuid, Path, description = "Invoice ID")
    ),
    responses(
        (status = 200, description = "Payments in date order", body = Vec<Payment>),
        (status = 404, description = "Invoice not found")
    ),
    tag = "Payments"
)]
#[instrument(skip(state))]
pub async fn list_payments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Payment>>, AppError> {
    let payments = PaymentService::list_payments(&state.db, InvoiceId::from(id)).await?;
    Ok(Json(payments))
}
