//! Payment-related API handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::payment::{Payment, ProcessPaymentRequest};
use crate::state::AppState;

/// Process a payment for a trip (idempotent by trip id)
pub async fn process_payment(
    State(state): State<AppState>,
    Json(request): Json<ProcessPaymentRequest>,
) -> AppResult<Json<Payment>> {
    let payment = state
        .payment_service
        .process(request.trip_id, request.amount)
        .await?;
    Ok(Json(payment))
}

/// Get a single payment by ID
pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Payment>> {
    let payment = state.payment_service.get_payment(id).await?;
    Ok(Json(payment))
}
