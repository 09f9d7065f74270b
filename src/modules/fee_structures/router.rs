use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{create_fee_structure, get_fee_structure, list_fee_structures};

/// Routes: POST /, GET /, GET /{id}
pub fn init_fee_structures_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_fee_structures).post(create_fee_structure))
        .route("/{id}", get(get_fee_structure))
}
