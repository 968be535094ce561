//! Request logging middleware.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

/// One log line per request, emitted on completion. The `resource` field is
/// the first path segment under `/api`, so log queries can group by domain
/// (rides, drivers, trips, payments, users).
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let resource = resource_of(&path).to_owned();

    let started = Instant::now();
    let response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match status {
        500..=599 => {
            tracing::error!(%method, %path, %resource, status, elapsed_ms, "request failed")
        }
        400..=499 => {
            tracing::warn!(%method, %path, %resource, status, elapsed_ms, "request rejected")
        }
        _ => tracing::info!(%method, %path, %resource, status, elapsed_ms, "request served"),
    }

    response
}

/// Domain segment of an API path: `/api/trips/123/end` -> `trips`.
fn resource_of(path: &str) -> &str {
    path.strip_prefix("/api/")
        .and_then(|rest| rest.split('/').next())
        .filter(|segment| !segment.is_empty())
        .unwrap_or("root")
}
