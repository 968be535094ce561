//! PostgreSQL pool setup and migrations.

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::Config;

/// How long a request may wait for a pooled connection. Kept well under the
/// 10 s driver lock ttl, so a saturated pool surfaces as an error instead of
/// silently eating a matcher's critical section.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(3);

/// Idle connections are retired after this long.
const IDLE_TIMEOUT: Duration = Duration::from_secs(300);

/// Connections held open even when idle. Matching and trip-end both issue
/// short query bursts; one warm connection avoids paying connect latency on
/// the first request after a quiet spell.
const MIN_CONNECTIONS: u32 = 1;

/// Database setup and health errors
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database connection failed: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("database migration failed: {0}")]
    Migrate(#[source] sqlx::migrate::MigrateError),

    #[error("database health check failed: {0}")]
    Health(#[source] sqlx::Error),
}

/// Open the connection pool and bring the schema up to date.
pub async fn connect(config: &Config) -> Result<PgPool, DbError> {
    tracing::info!(url = %config.database_url_masked(), "Opening database pool");

    let pool = PgPoolOptions::new()
        .min_connections(MIN_CONNECTIONS)
        .max_connections(config.db_max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .idle_timeout(IDLE_TIMEOUT)
        .connect(&config.database_url)
        .await
        .map_err(DbError::Connect)?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(DbError::Migrate)?;

    tracing::info!(
        max_connections = config.db_max_connections,
        "Database ready, schema up to date"
    );

    Ok(pool)
}

/// Round-trip a trivial query and report its latency, for the health
/// endpoint.
pub async fn ping(pool: &PgPool) -> Result<Duration, DbError> {
    let started = Instant::now();

    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(DbError::Health)?;

    Ok(started.elapsed())
}
