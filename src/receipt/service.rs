//! Receipt building: a pure projection of trip + ride + payment, persisted
//! once per trip.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::geo;
use crate::payment::{Payment, PaymentStatus};
use crate::receipt::Receipt;
use crate::repository::receipts;
use crate::ride::Ride;
use crate::trip::{fare, Trip};

/// Receipt service.
pub struct ReceiptService {
    pool: PgPool,
}

impl ReceiptService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Compose a receipt for an ended trip.
    ///
    /// The fare breakdown is derived so that `base_fare + surge_amount`
    /// equals the charged total exactly. Distance is the straight-line
    /// great-circle estimate between pickup and destination, not route
    /// distance.
    pub fn compose(trip: &Trip, ride: &Ride, payment: Option<&Payment>) -> AppResult<Receipt> {
        let ended_at = trip
            .ended_at
            .ok_or_else(|| AppError::conflict("trip has not ended"))?;

        let billable = fare::effective_seconds(trip.started_at, ended_at, trip.total_paused_seconds);
        let base_fare = fare::calculate_base_fare(billable, &fare::FareParams::default());
        let surge_multiplier = ride.surge_multiplier.max(1.0);
        let total_fare = trip.fare;
        let surge_amount = (total_fare - base_fare).max(0.0);

        let distance_km = geo::distance_km(
            ride.pickup_lat,
            ride.pickup_lng,
            ride.destination_lat,
            ride.destination_lng,
        );

        let payment_status = payment
            .map(|p| p.status)
            .unwrap_or(PaymentStatus::Pending);

        Ok(Receipt {
            id: Uuid::new_v4(),
            trip_id: trip.id,
            ride_id: ride.id,
            driver_id: trip.driver_id,
            rider_id: ride.rider_id,
            pickup_lat: ride.pickup_lat,
            pickup_lng: ride.pickup_lng,
            destination_lat: ride.destination_lat,
            destination_lng: ride.destination_lng,
            base_fare,
            surge_multiplier,
            surge_amount,
            total_fare,
            payment_method: ride.payment_method,
            payment_status,
            duration_seconds: billable,
            distance_km,
            started_at: trip.started_at,
            ended_at,
            created_at: Utc::now(),
        })
    }

    /// Compose and persist the receipt for an ended trip. The UNIQUE trip_id
    /// constraint makes the stored receipt write-once.
    pub async fn build_and_store(
        &self,
        trip: &Trip,
        ride: &Ride,
        payment: Option<&Payment>,
    ) -> AppResult<Receipt> {
        let receipt = Self::compose(trip, ride, payment)?;
        receipts::insert(&self.pool, &receipt).await?;
        Ok(receipt)
    }

    /// Get the receipt for a trip
    pub async fn get_receipt_for_trip(&self, trip_id: Uuid) -> AppResult<Receipt> {
        receipts::fetch_by_trip(&self.pool, trip_id)
            .await?
            .ok_or_else(|| AppError::not_found("receipt"))
    }
}
