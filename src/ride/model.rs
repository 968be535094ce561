//! Ride models and data structures

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::driver::DriverTier;

/// Ride record
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Ride {
    pub id: Uuid,
    pub rider_id: Uuid,
    pub pickup_lat: f64,
    pub pickup_lng: f64,
    pub destination_lat: f64,
    pub destination_lng: f64,
    pub status: RideStatus,
    pub assigned_driver_id: Option<Uuid>,
    /// 1.0 = no surge, 1.5 = 50% surge, 2.0 = 100% surge
    pub surge_multiplier: f64,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancel_reason: Option<String>,
}

/// Ride lifecycle status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "TEXT", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RideStatus {
    Requested,
    Assigned,
    InTrip,
    Completed,
    Cancelled,
}

impl RideStatus {
    /// Statuses that count toward demand when pricing surge.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            RideStatus::Requested | RideStatus::Assigned | RideStatus::InTrip
        )
    }
}

/// Payment method chosen for a ride
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "TEXT", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    Wallet,
    Upi,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

/// Request DTO for creating a ride
#[derive(Debug, Deserialize)]
pub struct CreateRideRequest {
    pub rider_id: Uuid,
    pub pickup_lat: f64,
    pub pickup_lng: f64,
    pub destination_lat: f64,
    pub destination_lng: f64,
    pub tier: Option<DriverTier>,
    pub payment_method: Option<PaymentMethod>,
}

/// Response DTO for ride creation
#[derive(Debug, Serialize)]
pub struct CreateRideResponse {
    pub ride: Ride,
    pub driver_assigned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<Uuid>,
    pub surge_multiplier: f64,
}

/// Request DTO for cancelling a ride
#[derive(Debug, Deserialize)]
pub struct CancelRideRequest {
    pub cancelled_by: String,
    pub reason: String,
}
