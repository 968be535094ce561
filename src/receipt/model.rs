//! Receipt model: an immutable, write-once artifact keyed by trip.

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::payment::PaymentStatus;
use crate::ride::PaymentMethod;

/// Trip receipt. `base_fare + surge_amount == total_fare`.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Receipt {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub ride_id: Uuid,
    pub driver_id: Uuid,
    pub rider_id: Uuid,
    pub pickup_lat: f64,
    pub pickup_lng: f64,
    pub destination_lat: f64,
    pub destination_lng: f64,
    pub base_fare: f64,
    pub surge_multiplier: f64,
    pub surge_amount: f64,
    pub total_fare: f64,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub duration_seconds: i64,
    /// Estimated straight-line distance in kilometers, not route distance
    pub distance_km: f64,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
