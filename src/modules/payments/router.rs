use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{list_payments, record_payment};

pub fn init_payments_router() -> Router<AppState> {
    Router::new().route("/{id}/payments", get(list_payments).post(record_payment))
}
