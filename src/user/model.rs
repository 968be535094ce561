//! Rider models and data structures

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

/// Rider record
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for registering a rider
#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    pub name: String,
    pub phone: String,
}
