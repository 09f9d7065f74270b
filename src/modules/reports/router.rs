use axum::{
    Router,
    routing::{get, put},
};

use crate::modules::results::controller::get_student_results;
use crate::state::AppState;

use super::controller::{get_performance, get_term_report, upsert_report_comment};

/// Student-scoped routes: GET /{id}/results, GET /{id}/report,
/// PUT /{id}/report/comments, GET /{id}/performance
pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/{id}/results", get(get_student_results))
        .route("/{id}/report", get(get_term_report))
        .route("/{id}/report/comments", put(upsert_report_comment))
        .route("/{id}/performance", get(get_performance))
}
