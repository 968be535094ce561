//! Trip route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::trip;
use crate::state::AppState;

pub fn trip_routes() -> Router<AppState> {
    Router::new()
        .route("/api/trips", get(trip::list_trips))
        .route("/api/trips/:id", get(trip::get_trip))
        .route("/api/trips/:id/pause", post(trip::pause_trip))
        .route("/api/trips/:id/resume", post(trip::resume_trip))
        .route("/api/trips/:id/end", post(trip::end_trip))
        .route("/api/trips/:id/receipt", get(trip::get_trip_receipt))
}
