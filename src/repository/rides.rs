//! Ride repository

use sqlx::PgExecutor;
use uuid::Uuid;

use crate::ride::Ride;

pub async fn insert<'e, E>(executor: E, ride: &Ride) -> Result<(), sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO rides (
            id, rider_id, pickup_lat, pickup_lng, destination_lat, destination_lng,
            status, assigned_driver_id, surge_multiplier, payment_method,
            created_at, cancelled_at, cancel_reason
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        "#,
    )
    .bind(ride.id)
    .bind(ride.rider_id)
    .bind(ride.pickup_lat)
    .bind(ride.pickup_lng)
    .bind(ride.destination_lat)
    .bind(ride.destination_lng)
    .bind(ride.status)
    .bind(ride.assigned_driver_id)
    .bind(ride.surge_multiplier)
    .bind(ride.payment_method)
    .bind(ride.created_at)
    .bind(ride.cancelled_at)
    .bind(ride.cancel_reason.as_deref())
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn fetch<'e, E>(executor: E, id: Uuid) -> Result<Option<Ride>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Ride>("SELECT * FROM rides WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Update the mutable ride fields. Returns false when the ride does not exist.
pub async fn update<'e, E>(executor: E, ride: &Ride) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        UPDATE rides
        SET status = $1, assigned_driver_id = $2, surge_multiplier = $3,
            cancelled_at = $4, cancel_reason = $5
        WHERE id = $6
        "#,
    )
    .bind(ride.status)
    .bind(ride.assigned_driver_id)
    .bind(ride.surge_multiplier)
    .bind(ride.cancelled_at)
    .bind(ride.cancel_reason.as_deref())
    .bind(ride.id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list<'e, E>(executor: E, limit: i64) -> Result<Vec<Ride>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Ride>("SELECT * FROM rides ORDER BY created_at DESC LIMIT $1")
        .bind(limit)
        .fetch_all(executor)
        .await
}

/// Rides that count toward demand: REQUESTED, ASSIGNED or IN_TRIP.
pub async fn list_active<'e, E>(executor: E) -> Result<Vec<Ride>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Ride>(
        "SELECT * FROM rides WHERE status IN ('REQUESTED', 'ASSIGNED', 'IN_TRIP')",
    )
    .fetch_all(executor)
    .await
}
