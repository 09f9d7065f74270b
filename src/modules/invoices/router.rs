use axum::{Router, routing::get};

use crate::modules::payments::router::init_payments_router;
use crate::state::AppState;

use super::controller::{create_invoice, get_invoice, list_invoices};

/// Routes: POST /, GET /, GET /{id}, plus payments under /{id}/payments
pub fn init_invoices_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_invoices).post(create_invoice))
        .route("/{id}", get(get_invoice))
        .merge(init_payments_router())
}
