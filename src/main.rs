//! Ridehail backend server
//!
//! Boots the dispatch core: configuration, database pool and migrations,
//! the in-memory location index and lock registry, the service graph, and
//! the HTTP API with graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::{routing::get, Router};
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};

use ridehail::config::Config;
use ridehail::db;
use ridehail::driver::DriverService;
use ridehail::location::InMemoryLocationIndex;
use ridehail::lock::InMemoryLockRegistry;
use ridehail::matching::MatchingService;
use ridehail::middleware;
use ridehail::notification::Notifier;
use ridehail::payment::{MockPsp, PaymentService};
use ridehail::receipt::ReceiptService;
use ridehail::ride::RideService;
use ridehail::routes;
use ridehail::state::AppState;
use ridehail::surge::SurgeService;
use ridehail::trip::TripService;
use ridehail::user::UserService;

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .init();

    tracing::info!(environment = config.environment.as_str(), "Starting ridehail backend");

    // Database pool and migrations
    let pool = match db::connect(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to set up database: {}", e);
            std::process::exit(1);
        }
    };

    // Shared adapters
    let location_index = Arc::new(InMemoryLocationIndex::new());
    let locks = Arc::new(InMemoryLockRegistry::new());
    let notifier = Arc::new(Notifier::new());
    let psp = Arc::new(MockPsp::approving());

    // Service graph, leaf-first
    let surge_service = Arc::new(SurgeService::new(pool.clone(), location_index.clone()));
    let matching_service = Arc::new(MatchingService::new(
        pool.clone(),
        location_index.clone(),
        locks.clone(),
    ));
    let payment_service = Arc::new(PaymentService::new(pool.clone(), psp));
    let receipt_service = Arc::new(ReceiptService::new(pool.clone()));
    let trip_service = Arc::new(TripService::new(
        pool.clone(),
        payment_service.clone(),
        receipt_service.clone(),
        notifier.clone(),
    ));
    let ride_service = Arc::new(RideService::new(
        pool.clone(),
        matching_service,
        surge_service,
        locks,
        notifier.clone(),
    ));
    let driver_service = Arc::new(DriverService::new(pool.clone(), location_index));
    let user_service = Arc::new(UserService::new(pool.clone()));

    let app_state = AppState::new(
        pool.clone(),
        ride_service,
        driver_service,
        trip_service,
        payment_service,
        receipt_service,
        user_service,
    );

    let health_pool = pool.clone();

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(move || health_check(health_pool.clone())))
        .merge(routes::ride_routes())
        .merge(routes::driver_routes())
        .merge(routes::trip_routes())
        .merge(routes::payment_routes())
        .merge(routes::user_routes())
        .with_state(app_state)
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .layer(configure_cors(&config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    tracing::info!("Server listening on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
    }

    tracing::info!("Server shutdown complete");
}

async fn root() -> &'static str {
    "Ridehail API Server"
}

/// Health check response
#[derive(serde::Serialize)]
struct HealthResponse {
    status: String,
    database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
    version: String,
}

/// Health check endpoint
async fn health_check(pool: sqlx::PgPool) -> axum::Json<HealthResponse> {
    let (status, database, latency_ms) = match ridehail::db::ping(&pool).await {
        Ok(latency) => (
            "healthy",
            "connected".to_string(),
            Some(latency.as_millis() as u64),
        ),
        Err(e) => ("unhealthy", e.to_string(), None),
    };

    axum::Json(HealthResponse {
        status: status.to_string(),
        database,
        latency_ms,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn configure_cors(config: &Config) -> CorsLayer {
    let Some(origins_str) = config
        .cors_allowed_origins
        .as_deref()
        .filter(|s| !s.is_empty())
    else {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (permissive)");
        return CorsLayer::permissive();
    };

    let origins: Vec<HeaderValue> = origins_str
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
