//! Rider route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::user;
use crate::state::AppState;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(user::register_user))
        .route("/api/users", get(user::list_users))
        .route("/api/users/:id", get(user::get_user))
}
