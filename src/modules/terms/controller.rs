use axum::{Json, extract::State};
use tracing::instrument;

use schoolbook_core::AppError;

use crate::modules::terms::model::TermWithSession;
use crate::modules::terms::service::TermService;
use crate::state::AppState;

/// Get the current term
#[utoipa::path(
    get,
    path = "/api/terms/current",
    summary = "Get current term",
    responses(
        (status = 200, description = "Current term with its session", body = TermWithSession),
        (status = 404, description = "No current term found")
    ),
    tag = "Terms"
)]
#[instrument(skip(state))]
pub async fn get_current_term(
    State(state): State<AppState>,
) -> Result<Json<TermWithSession>, AppError> {
    let term = TermService::resolve_term(&state.db, None).await?;
    Ok(Json(term))
}
