//! Payment repository

use sqlx::PgExecutor;
use uuid::Uuid;

use crate::payment::{Payment, PaymentStatus};

pub async fn insert<'e, E>(executor: E, payment: &Payment) -> Result<(), sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO payments (id, trip_id, amount, status, idempotency_key)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(payment.id)
    .bind(payment.trip_id)
    .bind(payment.amount)
    .bind(payment.status)
    .bind(&payment.idempotency_key)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn fetch<'e, E>(executor: E, id: Uuid) -> Result<Option<Payment>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn fetch_by_idempotency_key<'e, E>(
    executor: E,
    key: &str,
) -> Result<Option<Payment>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE idempotency_key = $1")
        .bind(key)
        .fetch_optional(executor)
        .await
}

pub async fn update_status<'e, E>(
    executor: E,
    id: Uuid,
    status: PaymentStatus,
) -> Result<(), sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query("UPDATE payments SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(id)
        .execute(executor)
        .await?;

    Ok(())
}
