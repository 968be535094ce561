//! Payment models and data structures

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payment record
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Payment {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub amount: f64,
    pub status: PaymentStatus,
    pub idempotency_key: String,
}

/// Payment outcome status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "TEXT", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

/// Request DTO for processing a payment
#[derive(Debug, Deserialize)]
pub struct ProcessPaymentRequest {
    pub trip_id: Uuid,
    pub amount: f64,
}

/// Stable idempotency key for a trip's payment. Retries with the same trip
/// resolve to the same key, and therefore the same payment row.
pub fn idempotency_key_for_trip(trip_id: Uuid) -> String {
    format!("payment:{}", trip_id)
}
