use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::fee_structures::controller::get_term_fee_summary;
use crate::modules::invoices::controller::generate_term_invoices;
use crate::state::AppState;

use super::controller::get_current_term;

/// Routes: GET /current, GET /{id}/fee-summary, POST /{id}/invoices/generate
pub fn init_terms_router() -> Router<AppState> {
    Router::new()
        .route("/current", get(get_current_term))
        .route("/{id}/fee-summary", get(get_term_fee_summary))
        .route("/{id}/invoices/generate", post(generate_term_invoices))
}
