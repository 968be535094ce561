//! Trip models and data structures

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::payment::Payment;
use crate::receipt::Receipt;

/// Trip record
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Trip {
    pub id: Uuid,
    pub ride_id: Uuid,
    pub driver_id: Uuid,
    pub status: TripStatus,
    pub fare: f64,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub paused_at: Option<DateTime<Utc>>,
    /// Accumulated pause time, excluded from fare accounting
    pub total_paused_seconds: i64,
}

/// Trip lifecycle status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "TEXT", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripStatus {
    Started,
    Paused,
    Ended,
}

/// Request DTO for starting a trip (driver accepting a ride)
#[derive(Debug, Deserialize)]
pub struct StartTripRequest {
    pub ride_id: Uuid,
}

/// Response DTO for ending a trip
#[derive(Debug, Serialize)]
pub struct EndTripResponse {
    pub trip: Trip,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<Payment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<Receipt>,
}
