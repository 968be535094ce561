//! Trip repository

use sqlx::PgExecutor;
use uuid::Uuid;

use crate::trip::Trip;

pub async fn insert<'e, E>(executor: E, trip: &Trip) -> Result<(), sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO trips (
            id, ride_id, driver_id, status, fare,
            started_at, ended_at, paused_at, total_paused_seconds
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(trip.id)
    .bind(trip.ride_id)
    .bind(trip.driver_id)
    .bind(trip.status)
    .bind(trip.fare)
    .bind(trip.started_at)
    .bind(trip.ended_at)
    .bind(trip.paused_at)
    .bind(trip.total_paused_seconds)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn fetch<'e, E>(executor: E, id: Uuid) -> Result<Option<Trip>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Update the mutable trip fields. Returns false when the trip does not exist.
pub async fn update<'e, E>(executor: E, trip: &Trip) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        UPDATE trips
        SET status = $1, fare = $2, ended_at = $3, paused_at = $4, total_paused_seconds = $5
        WHERE id = $6
        "#,
    )
    .bind(trip.status)
    .bind(trip.fare)
    .bind(trip.ended_at)
    .bind(trip.paused_at)
    .bind(trip.total_paused_seconds)
    .bind(trip.id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list<'e, E>(executor: E, limit: i64) -> Result<Vec<Trip>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Trip>("SELECT * FROM trips ORDER BY started_at DESC LIMIT $1")
        .bind(limit)
        .fetch_all(executor)
        .await
}

/// The driver's active (non-ENDED) trip, if any. The partial unique index
/// guarantees at most one row can match.
pub async fn fetch_active_by_driver<'e, E>(
    executor: E,
    driver_id: Uuid,
) -> Result<Option<Trip>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Trip>(
        "SELECT * FROM trips WHERE driver_id = $1 AND status <> 'ENDED' LIMIT 1",
    )
    .bind(driver_id)
    .fetch_optional(executor)
    .await
}
