//! Driver service layer - registration, presence and location updates

use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::driver::{Driver, DriverStatus, DriverTier, RegisterDriverRequest};
use crate::error::{is_unique_violation, AppError, AppResult};
use crate::geo;
use crate::location::LocationIndex;
use crate::repository::drivers;

const LIST_LIMIT: i64 = 100;

/// Driver service: owns the OFFLINE/ONLINE side of the driver state machine
/// and keeps the location index fed.
pub struct DriverService {
    pool: PgPool,
    location_index: Arc<dyn LocationIndex>,
}

impl DriverService {
    pub fn new(pool: PgPool, location_index: Arc<dyn LocationIndex>) -> Self {
        Self {
            pool,
            location_index,
        }
    }

    /// Register a new driver. Phone numbers are unique; drivers start
    /// OFFLINE and BASIC unless a tier is given.
    pub async fn register_driver(&self, req: RegisterDriverRequest) -> AppResult<Driver> {
        if req.name.trim().is_empty() {
            return Err(AppError::validation("name must not be empty"));
        }
        if req.phone.trim().is_empty() {
            return Err(AppError::validation("phone must not be empty"));
        }

        let driver = Driver {
            id: Uuid::new_v4(),
            name: req.name,
            phone: req.phone,
            status: DriverStatus::Offline,
            tier: req.tier.unwrap_or(DriverTier::Basic),
            created_at: Utc::now(),
        };

        match drivers::insert(&self.pool, &driver).await {
            Ok(()) => Ok(driver),
            Err(e) if is_unique_violation(&e) => {
                Err(AppError::conflict("phone number is already registered"))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Record a driver's position and bring the driver ONLINE.
    ///
    /// The location index is the authority for coordinates only. The status
    /// transition is best-effort: a driver unknown to the store does not fail
    /// the call, because location updates may race registration.
    pub async fn update_location(&self, driver_id: Uuid, lat: f64, lng: f64) -> AppResult<()> {
        if !geo::is_valid_coordinate(lat, lng) {
            return Err(AppError::validation("invalid location"));
        }

        self.location_index
            .upsert(driver_id, lat, lng)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let updated = drivers::update_status(&self.pool, driver_id, DriverStatus::Online).await?;
        if !updated {
            tracing::debug!(driver_id = %driver_id, "Location update for unregistered driver");
        }

        Ok(())
    }

    /// Take a driver offline and drop it from the location index.
    pub async fn set_offline(&self, driver_id: Uuid) -> AppResult<()> {
        let updated = drivers::update_status(&self.pool, driver_id, DriverStatus::Offline).await?;
        if !updated {
            return Err(AppError::not_found("driver"));
        }

        self.location_index
            .remove(driver_id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(())
    }

    /// Get a single driver by ID
    pub async fn get_driver(&self, id: Uuid) -> AppResult<Driver> {
        drivers::fetch(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("driver"))
    }

    /// List the most recently registered drivers
    pub async fn list_drivers(&self) -> AppResult<Vec<Driver>> {
        Ok(drivers::list(&self.pool, LIST_LIMIT).await?)
    }
}
