//! Fire-and-forget notifications.
//!
//! Delivery is a structured log event; a real deployment would fan these out
//! to push/SMS/email providers. The interface returns nothing: notifications
//! must never block a caller or fail an operation.

use uuid::Uuid;

use crate::driver::Driver;
use crate::payment::Payment;
use crate::receipt::Receipt;
use crate::ride::Ride;
use crate::trip::Trip;

/// Notification sink.
#[derive(Debug, Default)]
pub struct Notifier;

impl Notifier {
    pub fn new() -> Self {
        Self
    }

    pub fn driver_assigned(&self, ride: &Ride, driver: &Driver) {
        tracing::info!(
            kind = "DRIVER_ASSIGNED",
            recipient = %ride.rider_id,
            ride_id = %ride.id,
            driver_id = %driver.id,
            driver_name = %driver.name,
            "Driver has been assigned to the ride"
        );
    }

    pub fn trip_started(&self, trip: &Trip, rider_id: Uuid) {
        tracing::info!(
            kind = "TRIP_STARTED",
            recipient = %rider_id,
            trip_id = %trip.id,
            "Trip has started"
        );
    }

    pub fn trip_paused(&self, trip: &Trip, rider_id: Uuid) {
        tracing::info!(
            kind = "TRIP_PAUSED",
            recipient = %rider_id,
            trip_id = %trip.id,
            "Trip has been paused"
        );
    }

    pub fn trip_resumed(&self, trip: &Trip, rider_id: Uuid) {
        tracing::info!(
            kind = "TRIP_RESUMED",
            recipient = %rider_id,
            trip_id = %trip.id,
            "Trip has resumed"
        );
    }

    pub fn trip_ended(&self, trip: &Trip, rider_id: Uuid, fare: f64) {
        tracing::info!(
            kind = "TRIP_ENDED",
            recipient = %rider_id,
            trip_id = %trip.id,
            fare = fare,
            "Trip has ended"
        );
    }

    pub fn payment_success(&self, payment: &Payment, rider_id: Uuid) {
        tracing::info!(
            kind = "PAYMENT_SUCCESS",
            recipient = %rider_id,
            payment_id = %payment.id,
            amount = payment.amount,
            "Payment was successful"
        );
    }

    pub fn payment_failed(&self, payment: &Payment, rider_id: Uuid) {
        tracing::warn!(
            kind = "PAYMENT_FAILED",
            recipient = %rider_id,
            payment_id = %payment.id,
            amount = payment.amount,
            "Payment failed"
        );
    }

    pub fn ride_cancelled(&self, ride: &Ride, cancelled_by: &str, reason: &str) {
        // Notify whichever party did not cancel, when one exists.
        let recipient = if cancelled_by == ride.rider_id.to_string() {
            ride.assigned_driver_id.map(|id| id.to_string())
        } else {
            Some(ride.rider_id.to_string())
        };

        let Some(recipient) = recipient else {
            return;
        };

        tracing::info!(
            kind = "RIDE_CANCELLED",
            recipient = %recipient,
            ride_id = %ride.id,
            cancelled_by = %cancelled_by,
            reason = %reason,
            "Ride was cancelled"
        );
    }

    pub fn receipt_ready(&self, receipt: &Receipt) {
        tracing::info!(
            kind = "RECEIPT_READY",
            recipient = %receipt.rider_id,
            receipt_id = %receipt.id,
            trip_id = %receipt.trip_id,
            total_fare = receipt.total_fare,
            "Receipt is ready"
        );
    }
}
