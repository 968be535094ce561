//! Trip service layer - the trip state machine and fare accounting
//!
//! STARTED <-> PAUSED -> ENDED, with pause time excluded from fares. Ending
//! a trip also completes the ride, returns the driver to ONLINE, and then
//! runs the post-commit side effects (payment, receipt, notifications) that
//! must never reverse the ended trip.

use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::driver::DriverStatus;
use crate::error::{is_unique_violation, AppError, AppResult};
use crate::notification::Notifier;
use crate::payment::PaymentService;
use crate::receipt::ReceiptService;
use crate::repository::{drivers, rides, trips};
use crate::ride::{Ride, RideStatus};
use crate::trip::fare;
use crate::trip::{EndTripResponse, Trip, TripStatus};

const LIST_LIMIT: i64 = 100;

/// Trip service: drives trips through their state machine.
pub struct TripService {
    pool: PgPool,
    payments: Arc<PaymentService>,
    receipts: Arc<ReceiptService>,
    notifier: Arc<Notifier>,
    fare_params: fare::FareParams,
}

impl TripService {
    pub fn new(
        pool: PgPool,
        payments: Arc<PaymentService>,
        receipts: Arc<ReceiptService>,
        notifier: Arc<Notifier>,
    ) -> Self {
        Self {
            pool,
            payments,
            receipts,
            notifier,
            fare_params: fare::FareParams::default(),
        }
    }

    /// Start a trip: the assigned driver accepts the ride.
    ///
    /// Rejected when the driver already has an active trip, when the ride is
    /// not ASSIGNED, or when it is assigned to a different driver. Trip
    /// creation, ride IN_TRIP and driver ON_TRIP commit atomically; the
    /// partial unique index on active trips is the final arbiter if two
    /// starts race past the pre-check.
    pub async fn start_trip(&self, ride_id: Uuid, driver_id: Uuid) -> AppResult<Trip> {
        if trips::fetch_active_by_driver(&self.pool, driver_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("driver already has an active trip"));
        }

        let ride = rides::fetch(&self.pool, ride_id)
            .await?
            .ok_or_else(|| AppError::not_found("ride"))?;

        if ride.status != RideStatus::Assigned {
            return Err(AppError::conflict("ride is not in ASSIGNED state"));
        }

        if ride.assigned_driver_id != Some(driver_id) {
            return Err(AppError::forbidden("driver is not assigned to this ride"));
        }

        let trip = Trip {
            id: Uuid::new_v4(),
            ride_id,
            driver_id,
            status: TripStatus::Started,
            fare: 0.0,
            started_at: Utc::now(),
            ended_at: None,
            paused_at: None,
            total_paused_seconds: 0,
        };

        let mut tx = self.pool.begin().await?;

        match trips::insert(&mut *tx, &trip).await {
            Ok(()) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(AppError::conflict("driver already has an active trip"));
            }
            Err(e) => return Err(e.into()),
        }

        let mut in_trip = ride.clone();
        in_trip.status = RideStatus::InTrip;
        if !rides::update(&mut *tx, &in_trip).await? {
            return Err(AppError::not_found("ride"));
        }

        drivers::update_status(&mut *tx, driver_id, DriverStatus::OnTrip).await?;

        tx.commit().await?;

        self.notifier.trip_started(&trip, ride.rider_id);

        Ok(trip)
    }

    /// Pause a STARTED trip.
    pub async fn pause_trip(&self, trip_id: Uuid) -> AppResult<Trip> {
        let mut trip = self.get_trip(trip_id).await?;

        if trip.status != TripStatus::Started {
            return Err(AppError::conflict("trip is not started"));
        }

        trip.status = TripStatus::Paused;
        trip.paused_at = Some(Utc::now());

        if !trips::update(&self.pool, &trip).await? {
            return Err(AppError::not_found("trip"));
        }

        if let Some(ride) = rides::fetch(&self.pool, trip.ride_id).await? {
            self.notifier.trip_paused(&trip, ride.rider_id);
        }

        Ok(trip)
    }

    /// Resume a PAUSED trip, folding the pause into the accumulated total.
    pub async fn resume_trip(&self, trip_id: Uuid) -> AppResult<Trip> {
        let mut trip = self.get_trip(trip_id).await?;

        if trip.status != TripStatus::Paused {
            return Err(AppError::conflict("trip is not paused"));
        }

        if let Some(paused_at) = trip.paused_at {
            trip.total_paused_seconds += (Utc::now() - paused_at).num_seconds().max(0);
        }

        trip.status = TripStatus::Started;
        trip.paused_at = None;

        if !trips::update(&self.pool, &trip).await? {
            return Err(AppError::not_found("trip"));
        }

        if let Some(ride) = rides::fetch(&self.pool, trip.ride_id).await? {
            self.notifier.trip_resumed(&trip, ride.rider_id);
        }

        Ok(trip)
    }

    /// End a trip: compute the fare, complete the ride, free the driver,
    /// then charge and build the receipt.
    ///
    /// Payment and receipt failures are captured, not propagated; the trip
    /// stays ENDED and payment can be retried later under the same
    /// idempotency key.
    pub async fn end_trip(&self, trip_id: Uuid) -> AppResult<EndTripResponse> {
        let mut trip = self.get_trip(trip_id).await?;

        if trip.status == TripStatus::Ended {
            return Err(AppError::conflict("trip has already ended"));
        }

        let ended_at = Utc::now();

        // A trip ended while paused bills nothing for the final pause.
        let mut total_paused_seconds = trip.total_paused_seconds;
        if trip.status == TripStatus::Paused {
            if let Some(paused_at) = trip.paused_at {
                total_paused_seconds += (ended_at - paused_at).num_seconds().max(0);
            }
        }

        let ride = rides::fetch(&self.pool, trip.ride_id)
            .await?
            .ok_or_else(|| AppError::not_found("ride"))?;

        let billable = fare::effective_seconds(trip.started_at, ended_at, total_paused_seconds);
        let base_fare = fare::calculate_base_fare(billable, &self.fare_params);
        let total_fare = fare::apply_surge(base_fare, ride.surge_multiplier);

        trip.status = TripStatus::Ended;
        trip.fare = total_fare;
        trip.ended_at = Some(ended_at);
        trip.paused_at = None;
        trip.total_paused_seconds = total_paused_seconds;

        let mut tx = self.pool.begin().await?;

        if !trips::update(&mut *tx, &trip).await? {
            return Err(AppError::not_found("trip"));
        }

        let mut completed = ride.clone();
        completed.status = RideStatus::Completed;
        if !rides::update(&mut *tx, &completed).await? {
            return Err(AppError::not_found("ride"));
        }

        drivers::update_status(&mut *tx, trip.driver_id, DriverStatus::Online).await?;

        tx.commit().await?;

        self.notifier.trip_ended(&trip, ride.rider_id, total_fare);

        let payment = match self.payments.process(trip.id, total_fare).await {
            Ok(payment) => Some(payment),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    trip_id = %trip.id,
                    "Payment failed after trip end; trip remains ended"
                );
                None
            }
        };

        if let Some(payment) = &payment {
            use crate::payment::PaymentStatus;
            match payment.status {
                PaymentStatus::Success => self.notifier.payment_success(payment, ride.rider_id),
                PaymentStatus::Failed => self.notifier.payment_failed(payment, ride.rider_id),
                PaymentStatus::Pending => {}
            }
        }

        let receipt = self.build_receipt(&trip, &completed, payment.as_ref()).await;

        Ok(EndTripResponse {
            trip,
            payment,
            receipt,
        })
    }

    /// Get a single trip by ID
    pub async fn get_trip(&self, id: Uuid) -> AppResult<Trip> {
        trips::fetch(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("trip"))
    }

    /// List the most recent trips
    pub async fn list_trips(&self) -> AppResult<Vec<Trip>> {
        Ok(trips::list(&self.pool, LIST_LIMIT).await?)
    }

    async fn build_receipt(
        &self,
        trip: &Trip,
        ride: &Ride,
        payment: Option<&crate::payment::Payment>,
    ) -> Option<crate::receipt::Receipt> {
        match self.receipts.build_and_store(trip, ride, payment).await {
            Ok(receipt) => {
                self.notifier.receipt_ready(&receipt);
                Some(receipt)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    trip_id = %trip.id,
                    "Failed to build receipt for ended trip"
                );
                None
            }
        }
    }
}
