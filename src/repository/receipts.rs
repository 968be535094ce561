//! Receipt repository. Receipts are write-once; there is no update path.

use sqlx::PgExecutor;
use uuid::Uuid;

use crate::receipt::Receipt;

pub async fn insert<'e, E>(executor: E, receipt: &Receipt) -> Result<(), sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO receipts (
            id, trip_id, ride_id, driver_id, rider_id,
            pickup_lat, pickup_lng, destination_lat, destination_lng,
            base_fare, surge_multiplier, surge_amount, total_fare,
            payment_method, payment_status, duration_seconds, distance_km,
            started_at, ended_at, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
        "#,
    )
    .bind(receipt.id)
    .bind(receipt.trip_id)
    .bind(receipt.ride_id)
    .bind(receipt.driver_id)
    .bind(receipt.rider_id)
    .bind(receipt.pickup_lat)
    .bind(receipt.pickup_lng)
    .bind(receipt.destination_lat)
    .bind(receipt.destination_lng)
    .bind(receipt.base_fare)
    .bind(receipt.surge_multiplier)
    .bind(receipt.surge_amount)
    .bind(receipt.total_fare)
    .bind(receipt.payment_method)
    .bind(receipt.payment_status)
    .bind(receipt.duration_seconds)
    .bind(receipt.distance_km)
    .bind(receipt.started_at)
    .bind(receipt.ended_at)
    .bind(receipt.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn fetch_by_trip<'e, E>(
    executor: E,
    trip_id: Uuid,
) -> Result<Option<Receipt>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Receipt>("SELECT * FROM receipts WHERE trip_id = $1")
        .bind(trip_id)
        .fetch_optional(executor)
        .await
}
