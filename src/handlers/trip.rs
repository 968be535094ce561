//! Trip-related API handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::receipt::Receipt;
use crate::state::AppState;
use crate::trip::{EndTripResponse, Trip};

/// Get a single trip by ID
pub async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Trip>> {
    let trip = state.trip_service.get_trip(id).await?;
    Ok(Json(trip))
}

/// List the most recent trips
pub async fn list_trips(State(state): State<AppState>) -> AppResult<Json<Vec<Trip>>> {
    let trips = state.trip_service.list_trips().await?;
    Ok(Json(trips))
}

/// Pause a trip
pub async fn pause_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Trip>> {
    let trip = state.trip_service.pause_trip(id).await?;
    Ok(Json(trip))
}

/// Resume a paused trip
pub async fn resume_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Trip>> {
    let trip = state.trip_service.resume_trip(id).await?;
    Ok(Json(trip))
}

/// End a trip: computes the fare, charges, and builds the receipt
pub async fn end_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EndTripResponse>> {
    let response = state.trip_service.end_trip(id).await?;
    Ok(Json(response))
}

/// Get the receipt of an ended trip
pub async fn get_trip_receipt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Receipt>> {
    let receipt = state.receipt_service.get_receipt_for_trip(id).await?;
    Ok(Json(receipt))
}
