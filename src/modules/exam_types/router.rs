use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

use super::controller::{
    create_exam_type, delete_exam_type, get_weight_scheme, list_exam_types, update_exam_type,
};

/// Routes: GET /, POST /, GET /scheme, PUT /{id}, DELETE /{id}
pub fn init_exam_types_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_exam_types).post(create_exam_type))
        .route("/scheme", get(get_weight_scheme))
        .route("/{id}", put(update_exam_type).delete(delete_exam_type))
}
