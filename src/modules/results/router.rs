use axum::{
    Router,
    routing::{post, put},
};

use crate::state::AppState;

use super::controller::{preview_grade, upsert_result};

/// Routes: PUT /results, POST /grades/preview
pub fn init_results_router() -> Router<AppState> {
    Router::new()
        .route("/results", put(upsert_result))
        .route("/grades/preview", post(preview_grade))
}
