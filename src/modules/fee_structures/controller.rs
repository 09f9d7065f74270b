use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use schoolbook_core::AppError;
use schoolbook_models::ids::{FeeStructureId, TermId};

use crate::modules::fee_structures::model::{
    CreateFeeStructureDto, FeeStructure, FeeStructureDetail, FeeStructureFilterParams,
    TermFeeSummary,
};
use crate::modules::fee_structures::service::FeeStructureService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Create a fee structure with its items
#[utoipa::path(
    post,
    path = "/api/fee-structures",
    summary = "Create fee structure",
    request_body = CreateFeeStructureDto,
    responses(
        (status = 201, description = "Fee structure created", body = FeeStructureDetail),
        (status = 404, description = "Class, term or fee item not found"),
        (status = 409, description = "Class already has a structure for the term"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Fee Structures"
)]
#[instrument(skip(state))]
pub async fn create_fee_structure(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateFeeStructureDto>,
) -> Result<(StatusCode, Json<FeeStructureDetail>), AppError> {
    let structure = FeeStructureService::create_fee_structure(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(structure)))
}

/// List fee structures
#[utoipa::path(
    get,
    path = "/api/fee-structures",
    summary = "List fee structures",
    params(FeeStructureFilterParams),
    responses(
        (status = 200, description = "Fee structures, newest first", body = Vec<FeeStructure>)
    ),
    tag = "Fee Structures"
)]
#[instrument(skip(state))]
pub async fn list_fee_structures(
    State(state): State<AppState>,
    Query(filters): Query<FeeStructureFilterParams>,
) -> Result<Json<Vec<FeeStructure>>, AppError> {
    let structures = FeeStructureService::list_fee_structures(&state.db, filters).await?;
    Ok(Json(structures))
}

/// Get a fee structure with items and total
#[utoipa::path(
    get,
    path = "/api/fee-structures/{id}",
    summary = "Get fee structure",
    params(
        ("id" = Uuid, Path, description = "Fee structure ID")
    ),
    responses(
        (status = 200, description = "Fee structure detail", body = FeeStructureDetail),
        (status = 404, description = "Fee structure not found")
    ),
    tag = "Fee Structures"
)]
#[instrument(skip(state))]
pub async fn get_fee_structure(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FeeStructureDetail>, AppError> {
    let structure = FeeStructureService::get_fee_structure(&state.db, FeeStructureId::from(id)).await?;
    Ok(Json(structure))
}

/// Per-class fee totals for a term
#[utoipa::path(
    get,
    path = "/api/terms/{id}/fee-summary",
    summary = "Term fee summary",
    params(
        ("id" = Uuid, Path, description = "Term ID")
    ),
    responses(
        (status = 200, description = "Totals per class", body = TermFeeSummary),
        (status = 404, description = "Term not found")
    ),
    tag = "Fee Structures"
)]
#[instrument(skip(state))]
pub async fn get_term_fee_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TermFeeSummary>, AppError> {
    let summary = FeeStructureService::term_summary(&state.db, TermId::from(id)).await?;
    Ok(Json(summary))
}
