//! Application state shared across handlers

use std::sync::Arc;

use sqlx::PgPool;

use crate::driver::DriverService;
use crate::payment::PaymentService;
use crate::receipt::ReceiptService;
use crate::ride::RideService;
use crate::trip::TripService;
use crate::user::UserService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub ride_service: Arc<RideService>,
    pub driver_service: Arc<DriverService>,
    pub trip_service: Arc<TripService>,
    pub payment_service: Arc<PaymentService>,
    pub receipt_service: Arc<ReceiptService>,
    pub user_service: Arc<UserService>,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        ride_service: Arc<RideService>,
        driver_service: Arc<DriverService>,
        trip_service: Arc<TripService>,
        payment_service: Arc<PaymentService>,
        receipt_service: Arc<ReceiptService>,
        user_service: Arc<UserService>,
    ) -> Self {
        Self {
            pool,
            ride_service,
            driver_service,
            trip_service,
            payment_service,
            receipt_service,
            user_service,
        }
    }
}
