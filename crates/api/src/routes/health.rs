//! Health check endpoints.

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use telemetry::{health, metrics, MetricsSnapshot};

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub event_store_connected: bool,
    pub aggregate_store_connected: bool,
    pub metrics: MetricsSnapshot,
}

/// GET /health - Full health check.
pub async fn health_handler() -> Json<HealthResponse> {
    let report = health().report();

    Json(HealthResponse {
        status: format!("{:?}", report.status).to_lowercase(),
        event_store_connected: health().event_store.is_healthy(),
        aggregate_store_connected: health().aggregate_store.is_healthy(),
        metrics: metrics().snapshot(),
    })
}

/// GET /health/ready - Readiness probe (can accept traffic).
pub async fn ready_handler() -> StatusCode {
    if health().is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health/live - Liveness probe (service is running).
pub async fn live_handler() -> StatusCode {
    if health().is_alive() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
