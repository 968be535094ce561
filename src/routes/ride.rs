//! Ride route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::ride;
use crate::state::AppState;

pub fn ride_routes() -> Router<AppState> {
    Router::new()
        .route("/api/rides", post(ride::create_ride))
        .route("/api/rides", get(ride::list_rides))
        .route("/api/rides/:id", get(ride::get_ride))
        .route("/api/rides/:id/cancel", post(ride::cancel_ride))
}
