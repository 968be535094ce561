//! Payment route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::payment;
use crate::state::AppState;

pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/api/payments", post(payment::process_payment))
        .route("/api/payments/:id", get(payment::get_payment))
}
