use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use schoolbook_core::AppError;
use schoolbook_models::ids::ExamTypeId;

use crate::modules::exam_types::model::{
    CreateExamTypeDto, ExamType, UpdateExamTypeDto, WeightSchemeStatus,
};
use crate::modules::exam_types::service::ExamTypeService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List exam types
#[utoipa::path(
    get,
    path = "/api/exam-types",
    summary = "List exam types",
    responses(
        (status = 200, description = "All exam types ordered by weight", body = Vec<ExamType>)
    ),
    tag = "Exam Types"
)]
#[instrument(skip(state))]
pub async fn list_exam_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<ExamType>>, AppError> {
    let exam_types = ExamTypeService::list_exam_types(&state.db).await?;
    Ok(Json(exam_types))
}

/// Create an exam type
#[utoipa::path(
    post,
    path = "/api/exam-types",
    summary = "Create exam type",
    request_body = CreateExamTypeDto,
    responses(
        (status = 201, description = "Exam type created", body = ExamType),
        (status = 400, description = "Malformed request body"),
        (status = 409, description = "Name already in use"),
        (status = 422, description = "Validation failed or weights would exceed 100")
    ),
    tag = "Exam Types"
)]
#[instrument(skip(state))]
pub async fn create_exam_type(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateExamTypeDto>,
) -> Result<(StatusCode, Json<ExamType>), AppError> {
    let exam_type = ExamTypeService::create_exam_type(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(exam_type)))
}

/// Update an exam type
#[utoipa::path(
    put,
    path = "/api/exam-types/{id}",
    summary = "Update exam type",
    params(
        ("id" = Uuid, Path, description = "Exam type ID")
    ),
    request_body = UpdateExamTypeDto,
    responses(
        (status = 200, description = "Exam type updated", body = ExamType),
        (status = 404, description = "Exam type not found"),
        (status = 409, description = "Name already in use"),
        (status = 422, description = "Validation failed or weights would exceed 100")
    ),
    tag = "Exam Types"
)]
#[instrument(skip(state))]
pub async fn update_exam_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateExamTypeDto>,
) -> Result<Json<ExamType>, AppError> {
    let exam_type =
        ExamTypeService::update_exam_type(&state.db, ExamTypeId::from(id), dto).await?;
    Ok(Json(exam_type))
}

/// Delete an exam type
#[utoipa::path(
    delete,
    path = "/api/exam-types/{id}",
    summary = "Delete exam type",
    params(
        ("id" = Uuid, Path, description = "Exam type ID")
    ),
    responses(
        (status = 204, description = "Exam type deleted"),
        (status = 404, description = "Exam type not found"),
        (status = 409, description = "Exam type has recorded results")
    ),
    tag = "Exam Types"
)]
#[instrument(skip(state))]
pub async fn delete_exam_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ExamTypeService::delete_exam_type(&state.db, ExamTypeId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Weight scheme status
#[utoipa::path(
    get,
    path = "/api/exam-types/scheme",
    summary = "Check the weight scheme",
    responses(
        (status = 200, description = "Weight total and whether it equals 100", body = WeightSchemeStatus)
    ),
    tag = "Exam Types"
)]
#[instrument(skip(state))]
pub async fn get_weight_scheme(
    State(state): State<AppState>,
) -> Result<Json<WeightSchemeStatus>, AppError> {
    let status = ExamTypeService::weight_scheme_status(&state.db).await?;
    Ok(Json(status))
}
