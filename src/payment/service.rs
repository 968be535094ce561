//! Payment service layer - idempotent charges against the PSP
//!
//! Payments are deduplicated by an idempotency key derived from the trip id.
//! The payment row is the authoritative outcome: PSP declines and PSP errors
//! both land as FAILED, and a FAILED payment is terminal - retrying with the
//! same trip returns the existing record instead of re-charging.

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::payment::{idempotency_key_for_trip, Payment, PaymentStatus, Psp};
use crate::repository::payments;

/// Payment service with PSP adapter.
pub struct PaymentService {
    pool: PgPool,
    psp: Arc<dyn Psp>,
}

impl PaymentService {
    pub fn new(pool: PgPool, psp: Arc<dyn Psp>) -> Self {
        Self { pool, psp }
    }

    /// Charge a trip, at most once.
    ///
    /// A second call with the same trip id returns the existing payment in
    /// whatever state it reached. Two concurrent first calls are resolved by
    /// the unique key constraint: the loser reads back the winner's row.
    pub async fn process(&self, trip_id: Uuid, amount: f64) -> AppResult<Payment> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(AppError::validation("payment amount must be positive"));
        }

        let key = idempotency_key_for_trip(trip_id);

        if let Some(existing) = payments::fetch_by_idempotency_key(&self.pool, &key).await? {
            tracing::debug!(
                trip_id = %trip_id,
                payment_id = %existing.id,
                "Returning existing payment for idempotency key"
            );
            return Ok(existing);
        }

        let mut payment = Payment {
            id: Uuid::new_v4(),
            trip_id,
            amount,
            status: PaymentStatus::Pending,
            idempotency_key: key.clone(),
        };

        match payments::insert(&self.pool, &payment).await {
            Ok(()) => {}
            Err(e) if is_unique_violation(&e) => {
                // Lost a race on the key; the winner's record is the outcome.
                return payments::fetch_by_idempotency_key(&self.pool, &key)
                    .await?
                    .ok_or_else(|| AppError::Internal("payment vanished after key conflict".into()));
            }
            Err(e) => return Err(e.into()),
        }

        let outcome = match self.psp.charge(amount).await {
            Ok(true) => PaymentStatus::Success,
            Ok(false) => {
                tracing::warn!(trip_id = %trip_id, amount, "PSP declined charge");
                PaymentStatus::Failed
            }
            Err(e) => {
                tracing::warn!(trip_id = %trip_id, amount, error = %e, "PSP charge errored");
                PaymentStatus::Failed
            }
        };

        payments::update_status(&self.pool, payment.id, outcome).await?;
        payment.status = outcome;

        Ok(payment)
    }

    /// Get a single payment by ID
    pub async fn get_payment(&self, id: Uuid) -> AppResult<Payment> {
        payments::fetch(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("payment"))
    }
}
