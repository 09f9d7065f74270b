use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use schoolbook_core::AppError;
use schoolbook_models::ids::{InvoiceId, TermId};

use crate::modules::invoices::model::{
    BulkInvoiceResult, CreateInvoiceDto, Invoice, InvoiceDetail, InvoiceFilterParams,
    PaginatedInvoicesResponse,
};
use crate::modules::invoices::service::InvoiceService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Issue an invoice to one student from a fee structure
#[utoipa::path(
    post,
    path = "/api/invoices",
    summary = "Create invoice",
    request_body = CreateInvoiceDto,
    responses(
        (status = 201, description = "Invoice created with line items", body = Invoice),
        (status = 404, description = "Student or fee structure not found"),
        (status = 409, description = "Student already invoiced for the structure"),
        (status = 422, description = "Inactive structure or invalid due date")
    ),
    tag = "Invoices"
)]
#[instrument(skip(state))]
pub async fn create_invoice(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateInvoiceDto>,
) -> Result<(StatusCode, Json<Invoice>), AppError> {
    let invoice = InvoiceService::create_invoice(&state.db, &state.finance_config, dto).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

/// List invoices with filters and pagination
#[utoipa::path(
    get,
    path = "/api/invoices",
    summary = "List invoices",
    params(InvoiceFilterParams),
    responses(
        (status = 200, description = "Paginated invoices", body = PaginatedInvoicesResponse)
    ),
    tag = "Invoices"
)]
#[instrument(skip(state))]
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(filters): Query<InvoiceFilterParams>,
) -> Result<Json<PaginatedInvoicesResponse>, AppError> {
    let invoices = InvoiceService::list_invoices(&state.db, filters).await?;
    Ok(Json(invoices))
}

/// Invoice with line items, payments and balance
#[utoipa::path(
    get,
    path = "/api/invoices/{id}",
    summary = "Get invoice",
    params(
        ("id" = Uuid, Path, description = "Invoice ID")
    ),
    responses(
        (status = 200, description = "Invoice detail", body = InvoiceDetail),
        (status = 404, description = "Invoice not found")
    ),
    tag = "Invoices"
)]
#[instrument(skip(state))]
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoiceDetail>, AppError> {
    let invoice = InvoiceService::get_invoice(&state.db, InvoiceId::from(id)).await?;
    Ok(Json(invoice))
}

/// Invoice every eligible student for a term
#[utoipa::path(
    post,
    path = "/api/terms/{id}/invoices/generate",
    summary = "Generate term invoices",
    params(
        ("id" = Uuid, Path, description = "Term ID")
    ),
    responses(
        (status = 200, description = "Created and skipped counts", body = BulkInvoiceResult),
        (status = 404, description = "Term not found")
    ),
    tag = "Invoices"
)]
#[instrument(skip(state))]
pub async fn generate_term_invoices(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BulkInvoiceResult>, AppError> {
    let result =
        InvoiceService::generate_term_invoices(&state.db, &state.finance_config, TermId::from(id))
            .await?;
    Ok(Json(result))
}
