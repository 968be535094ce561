//! Driver-related API handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::driver::{Driver, RegisterDriverRequest, UpdateLocationRequest};
use crate::error::AppResult;
use crate::state::AppState;
use crate::trip::{StartTripRequest, Trip};

/// Register a new driver
pub async fn register_driver(
    State(state): State<AppState>,
    Json(request): Json<RegisterDriverRequest>,
) -> AppResult<Json<Driver>> {
    let driver = state.driver_service.register_driver(request).await?;
    Ok(Json(driver))
}

/// Get a single driver by ID
pub async fn get_driver(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Driver>> {
    let driver = state.driver_service.get_driver(id).await?;
    Ok(Json(driver))
}

/// List drivers
pub async fn list_drivers(State(state): State<AppState>) -> AppResult<Json<Vec<Driver>>> {
    let drivers = state.driver_service.list_drivers().await?;
    Ok(Json(drivers))
}

/// Update a driver's location; side effect: the driver goes ONLINE
pub async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateLocationRequest>,
) -> AppResult<Json<serde_json::Value>> {
    state
        .driver_service
        .update_location(id, request.lat, request.lng)
        .await?;
    Ok(Json(serde_json::json!({ "status": "ONLINE" })))
}

/// Take a driver offline
pub async fn set_offline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    state.driver_service.set_offline(id).await?;
    Ok(Json(serde_json::json!({ "status": "OFFLINE" })))
}

/// Driver accepts an assigned ride, starting the trip
pub async fn accept_ride(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<StartTripRequest>,
) -> AppResult<Json<Trip>> {
    let trip = state.trip_service.start_trip(request.ride_id, id).await?;
    Ok(Json(trip))
}
