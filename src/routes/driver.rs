//! Driver route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::driver;
use crate::state::AppState;

pub fn driver_routes() -> Router<AppState> {
    Router::new()
        .route("/api/drivers", post(driver::register_driver))
        .route("/api/drivers", get(driver::list_drivers))
        .route("/api/drivers/:id", get(driver::get_driver))
        .route("/api/drivers/:id/location", post(driver::update_location))
        .route("/api/drivers/:id/offline", post(driver::set_offline))
        .route("/api/drivers/:id/accept", post(driver::accept_ride))
}
