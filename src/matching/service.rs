//! Driver-rider matching.
//!
//! Concurrency protocol, per entity:
//!
//! - the ride lock collapses concurrent matches for one ride to a single
//!   winner;
//! - the driver lock collapses concurrent matches for one driver across
//!   different rides;
//! - driver status is re-read from the store under the driver lock before
//!   assignment, because the location index and any earlier read may be
//!   stale;
//! - the transactional assignment plus the storage-level one-active-trip
//!   constraint back the locks up, so correctness never depends on the
//!   advisory layer alone.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use uuid::Uuid;

use crate::driver::{Driver, DriverStatus, DriverTier};
use crate::error::{AppError, AppResult};
use crate::location::LocationIndex;
use crate::lock::{driver_lock_key, ride_lock_key, LockRegistry};
use crate::repository::{drivers, rides};
use crate::ride::{Ride, RideStatus};

/// Search radius when the caller does not specify one.
pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 5.0;

/// Driver lock ttl. Must comfortably exceed re-read plus assignment.
pub const DRIVER_LOCK_TTL: Duration = Duration::from_secs(10);

/// Ride lock ttl, covering the whole candidate scan.
pub const RIDE_LOCK_TTL: Duration = Duration::from_secs(30);

/// Parameters for matching a ride.
#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub ride_id: Uuid,
    pub lat: f64,
    pub lng: f64,
    /// Restrict candidates to this tier when set.
    pub tier: Option<DriverTier>,
    /// Search radius in km; defaults to [`DEFAULT_SEARCH_RADIUS_KM`].
    pub radius_km: Option<f64>,
}

/// A successful match.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub driver_id: Uuid,
    pub ride: Ride,
}

/// Finds and assigns the nearest eligible driver to a ride.
pub struct MatchingService {
    pool: PgPool,
    location_index: Arc<dyn LocationIndex>,
    locks: Arc<dyn LockRegistry>,
}

impl MatchingService {
    pub fn new(
        pool: PgPool,
        location_index: Arc<dyn LocationIndex>,
        locks: Arc<dyn LockRegistry>,
    ) -> Self {
        Self {
            pool,
            location_index,
            locks,
        }
    }

    /// Match a REQUESTED ride to the nearest eligible driver.
    ///
    /// Candidates are tried strictly in the index's ascending-distance order,
    /// single pass, no backoff. Exhausting them yields
    /// [`AppError::NoDriverAvailable`].
    pub async fn match_ride(&self, req: MatchRequest) -> AppResult<MatchResult> {
        let radius_km = req
            .radius_km
            .filter(|r| *r > 0.0)
            .unwrap_or(DEFAULT_SEARCH_RADIUS_KM);

        let ride_lock = ride_lock_key(req.ride_id);
        if !self.locks.try_acquire(&ride_lock, RIDE_LOCK_TTL).await {
            return Err(AppError::conflict("ride is already being matched"));
        }

        let result = self.match_locked(&req, radius_km).await;

        self.locks.release(&ride_lock).await;

        result
    }

    async fn match_locked(&self, req: &MatchRequest, radius_km: f64) -> AppResult<MatchResult> {
        let ride = rides::fetch(&self.pool, req.ride_id)
            .await?
            .ok_or_else(|| AppError::not_found("ride"))?;

        if ride.status != RideStatus::Requested {
            return Err(AppError::conflict("ride is not in REQUESTED state"));
        }

        let candidates = match self
            .location_index
            .nearby(req.lat, req.lng, radius_km)
            .await
        {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(error = %e, ride_id = %req.ride_id, "Location index unavailable during matching");
                return Err(AppError::NoDriverAvailable);
            }
        };

        for candidate in candidates {
            // Cheap filter first; drivers the index knows but the store
            // doesn't are tolerated and skipped.
            let Some(driver) = drivers::fetch(&self.pool, candidate.driver_id).await? else {
                continue;
            };

            if driver.status != DriverStatus::Online {
                continue;
            }

            if let Some(tier) = req.tier {
                if driver.tier != tier {
                    continue;
                }
            }

            let driver_lock = driver_lock_key(driver.id);
            if !self.locks.try_acquire(&driver_lock, DRIVER_LOCK_TTL).await {
                // Another matcher holds this driver.
                continue;
            }

            // Mandatory re-read under the lock: the status seen above may
            // predate a concurrent assignment or an offline transition.
            let fresh = match drivers::fetch(&self.pool, driver.id).await {
                Ok(Some(driver)) => driver,
                Ok(None) => {
                    self.locks.release(&driver_lock).await;
                    continue;
                }
                Err(e) => {
                    self.locks.release(&driver_lock).await;
                    return Err(e.into());
                }
            };

            if fresh.status != DriverStatus::Online {
                self.locks.release(&driver_lock).await;
                continue;
            }

            match self.assign(&ride, &fresh).await {
                Ok(result) => {
                    tracing::info!(
                        ride_id = %result.ride.id,
                        driver_id = %result.driver_id,
                        distance_km = candidate.distance_km,
                        "Driver assigned to ride"
                    );
                    // The driver lock is left to expire: its ttl covers the
                    // window before the committed ON_TRIP status is observed
                    // by competing matchers.
                    return Ok(result);
                }
                Err(e) => {
                    self.locks.release(&driver_lock).await;
                    return Err(e);
                }
            }
        }

        Err(AppError::NoDriverAvailable)
    }

    /// Atomically bind the ride and the driver.
    async fn assign(&self, ride: &Ride, driver: &Driver) -> AppResult<MatchResult> {
        let mut tx = self.pool.begin().await?;

        let mut assigned = ride.clone();
        assigned.status = RideStatus::Assigned;
        assigned.assigned_driver_id = Some(driver.id);

        if !rides::update(&mut *tx, &assigned).await? {
            return Err(AppError::not_found("ride"));
        }

        if !drivers::update_status(&mut *tx, driver.id, DriverStatus::OnTrip).await? {
            return Err(AppError::not_found("driver"));
        }

        tx.commit().await?;

        Ok(MatchResult {
            driver_id: driver.id,
            ride: assigned,
        })
    }
}
