//! Driver models and data structures

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

/// Driver record
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub status: DriverStatus,
    pub tier: DriverTier,
    pub created_at: DateTime<Utc>,
}

/// Driver availability status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "TEXT", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriverStatus {
    Offline,
    Online,
    OnTrip,
}

/// Driver service tier. Influences matching eligibility, not pricing.
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "TEXT", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriverTier {
    Basic,
    Premium,
}

/// Request DTO for registering a driver
#[derive(Debug, Deserialize)]
pub struct RegisterDriverRequest {
    pub name: String,
    pub phone: String,
    pub tier: Option<DriverTier>,
}

/// Request DTO for a driver location update
#[derive(Debug, Deserialize)]
pub struct UpdateLocationRequest {
    pub lat: f64,
    pub lng: f64,
}
