//! Driver repository

use sqlx::PgExecutor;
use uuid::Uuid;

use crate::driver::{Driver, DriverStatus};

pub async fn insert<'e, E>(executor: E, driver: &Driver) -> Result<(), sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO drivers (id, name, phone, status, tier, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(driver.id)
    .bind(&driver.name)
    .bind(&driver.phone)
    .bind(driver.status)
    .bind(driver.tier)
    .bind(driver.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn fetch<'e, E>(executor: E, id: Uuid) -> Result<Option<Driver>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn list<'e, E>(executor: E, limit: i64) -> Result<Vec<Driver>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Driver>("SELECT * FROM drivers ORDER BY created_at DESC LIMIT $1")
        .bind(limit)
        .fetch_all(executor)
        .await
}

/// Set a driver's status. Returns false when the driver does not exist.
pub async fn update_status<'e, E>(
    executor: E,
    id: Uuid,
    status: DriverStatus,
) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("UPDATE drivers SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
