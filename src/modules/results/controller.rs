use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use schoolbook_core::AppError;
use schoolbook_models::ids::StudentId;

use crate::modules::results::model::{
    GradePreviewRequest, GradePreviewResponse, ResultFilterParams, ScoredResult, UpsertResultDto,
};
use crate::modules::results::service::ResultService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Record or correct a score
#[utoipa::path(
    put,
    path = "/api/results",
    summary = "Upsert result",
    request_body = UpsertResultDto,
    responses(
        (status = 201, description = "Result created", body = ScoredResult),
        (status = 200, description = "Existing result updated", body = ScoredResult),
        (status = 404, description = "Student, term, subject or exam type not found"),
        (status = 422, description = "Score is negative or exceeds the exam type's maximum")
    ),
    tag = "Results"
)]
#[instrument(skip(state))]
pub async fn upsert_result(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<UpsertResultDto>,
) -> Result<(StatusCode, Json<ScoredResult>), AppError> {
    let (result, created) = ResultService::upsert_result(&state.db, dto).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(result)))
}

/// List a student's results for a term
#[utoipa::path(
    get,
    path = "/api/students/{id}/results",
    summary = "List student results",
    params(
        ("id" = Uuid, Path, description = "Student ID"),
        ResultFilterParams
    ),
    responses(
        (status = 200, description = "Results ordered by subject", body = Vec<ScoredResult>),
        (status = 404, description = "Student or term not found")
    ),
    tag = "Results"
)]
#[instrument(skip(state))]
pub async fn get_student_results(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(filters): Query<ResultFilterParams>,
) -> Result<Json<Vec<ScoredResult>>, AppError> {
    let results =
        ResultService::list_for_student(&state.db, StudentId::from(id), filters.term_id).await?;
    Ok(Json(results))
}

/// Run the grade engine over ad-hoc scores
#[utoipa::path(
    post,
    path = "/api/grades/preview",
    summary = "Preview a grade",
    request_body = GradePreviewRequest,
    responses(
        (status = 200, description = "Final score, grade and weight coverage", body = GradePreviewResponse),
        (status = 422, description = "Invalid component")
    ),
    tag = "Results"
)]
#[instrument]
pub async fn preview_grade(
    ValidatedJson(request): ValidatedJson<GradePreviewRequest>,
) -> Result<Json<GradePreviewResponse>, AppError> {
    for component in &request.components {
        schoolbook_core::grading::validate_score(component.score, component.max_score)
            .map_err(AppError::unprocessable)?;
    }
    Ok(Json(ResultService::preview(&request)))
}
