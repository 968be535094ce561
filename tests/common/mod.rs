//! Shared setup for integration tests.

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use ridehail::driver::{Driver, DriverService, DriverTier, RegisterDriverRequest};
use ridehail::location::InMemoryLocationIndex;
use ridehail::lock::InMemoryLockRegistry;
use ridehail::matching::MatchingService;
use ridehail::notification::Notifier;
use ridehail::payment::{MockPsp, PaymentService};
use ridehail::receipt::ReceiptService;
use ridehail::ride::RideService;
use ridehail::surge::SurgeService;
use ridehail::trip::TripService;

/// Connect to the test database and apply migrations.
pub async fn setup_test_db() -> PgPool {
    let database_url = std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| "postgresql://localhost/ridehail_test".to_string());

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// The full service graph over in-memory adapters and a shared mock PSP.
pub struct TestApp {
    pub pool: PgPool,
    pub location_index: Arc<InMemoryLocationIndex>,
    pub locks: Arc<InMemoryLockRegistry>,
    pub psp: Arc<MockPsp>,
    pub ride_service: RideService,
    pub driver_service: DriverService,
    pub trip_service: TripService,
    pub payment_service: Arc<PaymentService>,
    pub receipt_service: Arc<ReceiptService>,
}

pub async fn build_app(psp: MockPsp) -> TestApp {
    let pool = setup_test_db().await;

    let location_index = Arc::new(InMemoryLocationIndex::new());
    let locks = Arc::new(InMemoryLockRegistry::new());
    let notifier = Arc::new(Notifier::new());
    let psp = Arc::new(psp);

    let surge_service = Arc::new(SurgeService::new(pool.clone(), location_index.clone()));
    let matching_service = Arc::new(MatchingService::new(
        pool.clone(),
        location_index.clone(),
        locks.clone(),
    ));
    let payment_service = Arc::new(PaymentService::new(pool.clone(), psp.clone()));
    let receipt_service = Arc::new(ReceiptService::new(pool.clone()));
    let trip_service = TripService::new(
        pool.clone(),
        payment_service.clone(),
        receipt_service.clone(),
        notifier.clone(),
    );
    let ride_service = RideService::new(
        pool.clone(),
        matching_service,
        surge_service,
        locks.clone(),
        notifier,
    );
    let driver_service = DriverService::new(pool.clone(), location_index.clone());

    TestApp {
        pool,
        location_index,
        locks,
        psp,
        ride_service,
        driver_service,
        trip_service,
        payment_service,
        receipt_service,
    }
}

/// Register a driver with a unique phone number.
pub async fn register_driver(app: &TestApp, name: &str, tier: DriverTier) -> Driver {
    app.driver_service
        .register_driver(RegisterDriverRequest {
            name: name.to_string(),
            phone: format!("+91-{}", Uuid::new_v4()),
            tier: Some(tier),
        })
        .await
        .expect("driver registration should succeed")
}

/// Register a driver and bring it online at the given position.
pub async fn online_driver(app: &TestApp, name: &str, lat: f64, lng: f64) -> Driver {
    let driver = register_driver(app, name, DriverTier::Basic).await;
    app.driver_service
        .update_location(driver.id, lat, lng)
        .await
        .expect("location update should succeed");
    driver
}
