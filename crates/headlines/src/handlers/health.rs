//! Health check endpoints for Kubernetes-style probes.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/healthz` - Pings the cache and the store

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
struct HealthStatus {
    healthy: bool,
    cache: bool,
    store: bool,
}

/// GET /livez - Basic liveness probe.
///
/// Returns 200 immediately. Used to check if the server is accepting connections.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /healthz - Pings both tiers concurrently.
///
/// Returns 200 when both answer, 503 otherwise.
#[axum::debug_handler]
pub async fn healthz(State(state): State<AppState>) -> Response {
    let (cache, store) = tokio::join!(state.cache.ping(), state.store.ping());

    if let Err(e) = &cache {
        tracing::warn!(error = %e, "Cache health check failed");
    }
    if let Err(e) = &store {
        tracing::warn!(error = %e, "Store health check failed");
    }

    let health = HealthStatus {
        healthy: cache.is_ok() && store.is_ok(),
        cache: cache.is_ok(),
        store: store.is_ok(),
    };
    let status = if health.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(health)).into_response()
}
