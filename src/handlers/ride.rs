//! Ride-related API handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::ride::{CancelRideRequest, CreateRideRequest, CreateRideResponse, Ride};
use crate::state::AppState;

/// Create a new ride and attempt to match it
pub async fn create_ride(
    State(state): State<AppState>,
    Json(request): Json<CreateRideRequest>,
) -> AppResult<Json<CreateRideResponse>> {
    let response = state.ride_service.create_ride(request).await?;
    Ok(Json(response))
}

/// Get a single ride by ID
pub async fn get_ride(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Ride>> {
    let ride = state.ride_service.get_ride(id).await?;
    Ok(Json(ride))
}

/// List the most recent rides
pub async fn list_rides(State(state): State<AppState>) -> AppResult<Json<Vec<Ride>>> {
    let rides = state.ride_service.list_rides().await?;
    Ok(Json(rides))
}

/// Cancel a ride
pub async fn cancel_ride(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CancelRideRequest>,
) -> AppResult<Json<Ride>> {
    let ride = state.ride_service.cancel_ride(id, request).await?;
    Ok(Json(ride))
}
