//! Ride service layer - ride creation, lookup and cancellation

use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::driver::DriverStatus;
use crate::error::{AppError, AppResult};
use crate::geo;
use crate::lock::{driver_lock_key, LockRegistry};
use crate::matching::{MatchRequest, MatchingService};
use crate::notification::Notifier;
use crate::repository::{drivers, rides};
use crate::ride::{CancelRideRequest, CreateRideRequest, CreateRideResponse, Ride, RideStatus};
use crate::surge::SurgeService;

/// Rides returned by the listing endpoint, most recent first.
const LIST_LIMIT: i64 = 100;

/// Ride service: creates rides, prices them and triggers matching.
pub struct RideService {
    pool: PgPool,
    matching: Arc<MatchingService>,
    surge: Arc<SurgeService>,
    locks: Arc<dyn LockRegistry>,
    notifier: Arc<Notifier>,
}

impl RideService {
    pub fn new(
        pool: PgPool,
        matching: Arc<MatchingService>,
        surge: Arc<SurgeService>,
        locks: Arc<dyn LockRegistry>,
        notifier: Arc<Notifier>,
    ) -> Self {
        Self {
            pool,
            matching,
            surge,
            locks,
            notifier,
        }
    }

    /// Create a ride and synchronously attempt to match it.
    ///
    /// The surge multiplier is computed before the ride is persisted and
    /// stays bound to the ride for its whole life. A failed match is not an
    /// error: the ride stays REQUESTED and the caller may retry later.
    pub async fn create_ride(&self, req: CreateRideRequest) -> AppResult<CreateRideResponse> {
        validate_create_request(&req)?;

        let surge_multiplier = self.surge.multiplier(req.pickup_lat, req.pickup_lng).await;

        let ride = Ride {
            id: Uuid::new_v4(),
            rider_id: req.rider_id,
            pickup_lat: req.pickup_lat,
            pickup_lng: req.pickup_lng,
            destination_lat: req.destination_lat,
            destination_lng: req.destination_lng,
            status: RideStatus::Requested,
            assigned_driver_id: None,
            surge_multiplier,
            payment_method: req.payment_method.unwrap_or_default(),
            created_at: Utc::now(),
            cancelled_at: None,
            cancel_reason: None,
        };

        rides::insert(&self.pool, &ride).await?;

        let match_result = self
            .matching
            .match_ride(MatchRequest {
                ride_id: ride.id,
                lat: req.pickup_lat,
                lng: req.pickup_lng,
                tier: req.tier,
                radius_km: None,
            })
            .await;

        match match_result {
            Ok(result) => {
                if let Ok(Some(driver)) = drivers::fetch(&self.pool, result.driver_id).await {
                    self.notifier.driver_assigned(&result.ride, &driver);
                }

                Ok(CreateRideResponse {
                    ride: result.ride,
                    driver_assigned: true,
                    driver_id: Some(result.driver_id),
                    surge_multiplier,
                })
            }
            Err(AppError::NoDriverAvailable) => Ok(CreateRideResponse {
                ride,
                driver_assigned: false,
                driver_id: None,
                surge_multiplier,
            }),
            Err(e) => Err(e),
        }
    }

    /// Get a single ride by ID
    pub async fn get_ride(&self, id: Uuid) -> AppResult<Ride> {
        rides::fetch(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("ride"))
    }

    /// List the most recent rides
    pub async fn list_rides(&self) -> AppResult<Vec<Ride>> {
        Ok(rides::list(&self.pool, LIST_LIMIT).await?)
    }

    /// Cancel a ride.
    ///
    /// Only REQUESTED and ASSIGNED rides can be cancelled; a ride with a trip
    /// in progress must be driven to trip end instead. Cancelling an ASSIGNED
    /// ride frees its driver: status back to ONLINE in the same transaction,
    /// advisory lock released best-effort.
    pub async fn cancel_ride(&self, id: Uuid, req: CancelRideRequest) -> AppResult<Ride> {
        let ride = rides::fetch(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("ride"))?;

        if ride.status == RideStatus::Cancelled {
            return Err(AppError::conflict("ride is already cancelled"));
        }

        if ride.status != RideStatus::Requested && ride.status != RideStatus::Assigned {
            return Err(AppError::conflict(
                "ride cannot be cancelled in its current state",
            ));
        }

        let was_assigned = ride.status == RideStatus::Assigned;

        let mut cancelled = ride.clone();
        cancelled.status = RideStatus::Cancelled;
        cancelled.cancelled_at = Some(Utc::now());
        cancelled.cancel_reason = Some(req.reason.clone());

        let mut tx = self.pool.begin().await?;

        if !rides::update(&mut *tx, &cancelled).await? {
            return Err(AppError::not_found("ride"));
        }

        if was_assigned {
            if let Some(driver_id) = cancelled.assigned_driver_id {
                drivers::update_status(&mut *tx, driver_id, DriverStatus::Online).await?;
            }
        }

        tx.commit().await?;

        if was_assigned {
            if let Some(driver_id) = cancelled.assigned_driver_id {
                self.locks.release(&driver_lock_key(driver_id)).await;
            }
        }

        self.notifier
            .ride_cancelled(&cancelled, &req.cancelled_by, &req.reason);

        Ok(cancelled)
    }
}

fn validate_create_request(req: &CreateRideRequest) -> AppResult<()> {
    if req.rider_id.is_nil() {
        return Err(AppError::validation("rider_id must not be empty"));
    }

    if !geo::is_valid_coordinate(req.pickup_lat, req.pickup_lng) {
        return Err(AppError::validation("invalid pickup location"));
    }

    if !geo::is_valid_coordinate(req.destination_lat, req.destination_lng) {
        return Err(AppError::validation("invalid destination location"));
    }

    Ok(())
}
