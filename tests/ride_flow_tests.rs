//! End-to-end ride flow: creation, pricing, matching, cancellation.

mod common;

use uuid::Uuid;

use ridehail::driver::{DriverStatus, DriverTier};
use ridehail::error::AppError;
use ridehail::payment::{MockPsp, PaymentStatus};
use ridehail::repository::drivers;
use ridehail::ride::{CancelRideRequest, CreateRideRequest, PaymentMethod, RideStatus};
use ridehail::trip::TripStatus;

fn ride_request(rider_id: Uuid) -> CreateRideRequest {
    CreateRideRequest {
        rider_id,
        pickup_lat: 12.971,
        pickup_lng: 77.594,
        destination_lat: 12.296,
        destination_lng: 76.639,
        tier: None,
        payment_method: Some(PaymentMethod::Cash),
    }
}

#[tokio::test]
#[ignore] // Requires database setup
async fn happy_path_ride_to_receipt() {
    let app = common::build_app(MockPsp::approving()).await;

    let driver = common::online_driver(&app, "D1", 12.971, 77.594).await;

    let response = app
        .ride_service
        .create_ride(ride_request(Uuid::new_v4()))
        .await
        .expect("ride creation should succeed");

    assert!(response.driver_assigned);
    assert_eq!(response.driver_id, Some(driver.id));
    assert_eq!(response.ride.status, RideStatus::Assigned);
    assert_eq!(response.surge_multiplier, 1.0);

    let assigned = drivers::fetch(&app.pool, driver.id).await.unwrap().unwrap();
    assert_eq!(assigned.status, DriverStatus::OnTrip);

    let trip = app
        .trip_service
        .start_trip(response.ride.id, driver.id)
        .await
        .expect("trip start should succeed");
    assert_eq!(trip.status, TripStatus::Started);

    let ended = app
        .trip_service
        .end_trip(trip.id)
        .await
        .expect("trip end should succeed");

    assert_eq!(ended.trip.status, TripStatus::Ended);
    // A trip ended immediately bills the minimum fare.
    assert_eq!(ended.trip.fare, 5.0);

    let payment = ended.payment.expect("payment should be recorded");
    assert_eq!(payment.status, PaymentStatus::Success);

    let receipt = ended.receipt.expect("receipt should be built");
    assert_eq!(receipt.trip_id, ended.trip.id);
    assert!((receipt.base_fare + receipt.surge_amount - receipt.total_fare).abs() < 1e-9);

    let ride = app.ride_service.get_ride(response.ride.id).await.unwrap();
    assert_eq!(ride.status, RideStatus::Completed);

    let freed = drivers::fetch(&app.pool, driver.id).await.unwrap().unwrap();
    assert_eq!(freed.status, DriverStatus::Online);
}

#[tokio::test]
#[ignore] // Requires database setup
async fn no_driver_leaves_ride_requested() {
    let app = common::build_app(MockPsp::approving()).await;

    // Index is empty: no supply anywhere near the pickup.
    let response = app
        .ride_service
        .create_ride(ride_request(Uuid::new_v4()))
        .await
        .expect("ride creation should succeed without drivers");

    assert!(!response.driver_assigned);
    assert_eq!(response.driver_id, None);
    assert_eq!(response.ride.status, RideStatus::Requested);
}

#[tokio::test]
#[ignore] // Requires database setup
async fn surge_doubles_at_zero_supply_with_demand() {
    let app = common::build_app(MockPsp::approving()).await;

    // One unmatched ride sits REQUESTED at the pickup; supply stays zero.
    let first = app
        .ride_service
        .create_ride(ride_request(Uuid::new_v4()))
        .await
        .unwrap();
    assert!(!first.driver_assigned);

    let second = app
        .ride_service
        .create_ride(ride_request(Uuid::new_v4()))
        .await
        .unwrap();

    assert_eq!(second.surge_multiplier, 2.0);
    assert_eq!(second.ride.surge_multiplier, 2.0);
    assert!(!second.driver_assigned);
}

#[tokio::test]
#[ignore] // Requires database setup
async fn tier_filter_skips_mismatched_drivers() {
    let app = common::build_app(MockPsp::approving()).await;

    let basic = common::online_driver(&app, "basic", 12.971, 77.594).await;
    assert_eq!(basic.tier, DriverTier::Basic);

    let mut request = ride_request(Uuid::new_v4());
    request.tier = Some(DriverTier::Premium);

    let response = app.ride_service.create_ride(request).await.unwrap();
    assert!(!response.driver_assigned, "basic driver must not match a premium request");

    // The skipped driver is untouched.
    let untouched = drivers::fetch(&app.pool, basic.id).await.unwrap().unwrap();
    assert_eq!(untouched.status, DriverStatus::Online);
}

#[tokio::test]
#[ignore] // Requires database setup
async fn cancel_after_assignment_frees_the_driver() {
    let app = common::build_app(MockPsp::approving()).await;

    let driver = common::online_driver(&app, "D1", 12.971, 77.594).await;

    let response = app
        .ride_service
        .create_ride(ride_request(Uuid::new_v4()))
        .await
        .unwrap();
    assert!(response.driver_assigned);

    let cancelled = app
        .ride_service
        .cancel_ride(
            response.ride.id,
            CancelRideRequest {
                cancelled_by: response.ride.rider_id.to_string(),
                reason: "user changed mind".to_string(),
            },
        )
        .await
        .expect("cancel should succeed");

    assert_eq!(cancelled.status, RideStatus::Cancelled);
    assert!(cancelled.cancelled_at.is_some());
    assert_eq!(cancelled.cancel_reason.as_deref(), Some("user changed mind"));

    // The driver is restored to ONLINE and can be matched again.
    let freed = drivers::fetch(&app.pool, driver.id).await.unwrap().unwrap();
    assert_eq!(freed.status, DriverStatus::Online);

    let rematch = app
        .ride_service
        .create_ride(ride_request(Uuid::new_v4()))
        .await
        .unwrap();
    assert!(rematch.driver_assigned);
    assert_eq!(rematch.driver_id, Some(driver.id));
}

#[tokio::test]
#[ignore] // Requires database setup
async fn cancelling_twice_conflicts_and_state_is_unchanged() {
    let app = common::build_app(MockPsp::approving()).await;

    let response = app
        .ride_service
        .create_ride(ride_request(Uuid::new_v4()))
        .await
        .unwrap();

    let request = |reason: &str| CancelRideRequest {
        cancelled_by: response.ride.rider_id.to_string(),
        reason: reason.to_string(),
    };

    let cancelled = app
        .ride_service
        .cancel_ride(response.ride.id, request("first"))
        .await
        .unwrap();

    let second = app
        .ride_service
        .cancel_ride(response.ride.id, request("second"))
        .await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    let unchanged = app.ride_service.get_ride(response.ride.id).await.unwrap();
    assert_eq!(unchanged.status, RideStatus::Cancelled);
    assert_eq!(unchanged.cancel_reason, cancelled.cancel_reason);
}

#[tokio::test]
#[ignore] // Requires database setup
async fn ride_in_trip_cannot_be_cancelled() {
    let app = common::build_app(MockPsp::approving()).await;

    let driver = common::online_driver(&app, "D1", 12.971, 77.594).await;

    let response = app
        .ride_service
        .create_ride(ride_request(Uuid::new_v4()))
        .await
        .unwrap();
    assert!(response.driver_assigned);

    app.trip_service
        .start_trip(response.ride.id, driver.id)
        .await
        .unwrap();

    let result = app
        .ride_service
        .cancel_ride(
            response.ride.id,
            CancelRideRequest {
                cancelled_by: response.ride.rider_id.to_string(),
                reason: "too late".to_string(),
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn create_ride_rejects_bad_coordinates_without_a_database() {
    // Validation happens before any storage access, so a bogus pool URL is
    // never dialed.
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgresql://localhost/unused")
        .unwrap();

    let location_index = std::sync::Arc::new(ridehail::location::InMemoryLocationIndex::new());
    let locks = std::sync::Arc::new(ridehail::lock::InMemoryLockRegistry::new());
    let notifier = std::sync::Arc::new(ridehail::notification::Notifier::new());

    let surge = std::sync::Arc::new(ridehail::surge::SurgeService::new(
        pool.clone(),
        location_index.clone(),
    ));
    let matching = std::sync::Arc::new(ridehail::matching::MatchingService::new(
        pool.clone(),
        location_index,
        locks.clone(),
    ));
    let ride_service =
        ridehail::ride::RideService::new(pool, matching, surge, locks, notifier);

    let mut request = ride_request(Uuid::new_v4());
    request.pickup_lat = 91.0;

    let result = ride_service.create_ride(request).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}
