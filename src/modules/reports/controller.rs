use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;
use uuid::Uuid;

use schoolbook_core::AppError;
use schoolbook_models::ids::StudentId;

use crate::modules::reports::model::{
    PerformanceDashboard, ReportComment, ReportQueryParams, TermReportDocument, UpsertCommentDto,
};
use crate::modules::reports::service::ReportService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Assemble a student's term report
#[utoipa::path(
    get,
    path = "/api/students/{id}/report",
    summary = "Get term report",
    params(
        ("id" = Uuid, Path, description = "Student ID"),
        ReportQueryParams
    ),
    responses(
        (status = 200, description = "Report ready for rendering", body = TermReportDocument),
        (status = 404, description = "Student or term not found, or no current term")
    ),
    tag = "Reports"
)]
#[instrument(skip(state))]
pub async fn get_term_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ReportQueryParams>,
) -> Result<Json<TermReportDocument>, AppError> {
    let report = ReportService::get_report(&state.db, StudentId::from(id), params.term_id).await?;
    Ok(Json(report))
}

/// Set the teacher or principal comment on a report
#[utoipa::path(
    put,
    path = "/api/students/{id}/report/comments",
    summary = "Upsert report comment",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    request_body = UpsertCommentDto,
    responses(
        (status = 200, description = "Comment stored", body = ReportComment),
        (status = 404, description = "Student or term not found"),
        (status = 422, description = "Comment is empty or too long")
    ),
    tag = "Reports"
)]
#[instrument(skip(state))]
pub async fn upsert_report_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpsertCommentDto>,
) -> Result<Json<ReportComment>, AppError> {
    let comment = ReportService::upsert_comment(&state.db, StudentId::from(id), dto).await?;
    Ok(Json(comment))
}

/// Student performance dashboard
#[utoipa::path(
    get,
    path = "/api/students/{id}/performance",
    summary = "Get performance dashboard",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Term history and current term breakdown", body = PerformanceDashboard),
        (status = 404, description = "Student not found")
    ),
    tag = "Reports"
)]
#[instrument(skip(state))]
pub async fn get_performance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PerformanceDashboard>, AppError> {
    let dashboard = ReportService::get_performance(&state.db, StudentId::from(id)).await?;
    Ok(Json(dashboard))
}
