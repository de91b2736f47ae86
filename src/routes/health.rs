// src/routes/health.rs
//! Liveness endpoint for the water-quality service.
//!
//! `GET /health` answers `{"status":"ok"}` when the storage engine answers a
//! trivial query, and `503 {"status":"unavailable"}` otherwise. Process
//! supervisors can use it to tell a hung database apart from a dead process.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::Storage;

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Handle `GET /health`.
async fn health(State(storage): State<Storage>) -> (StatusCode, Json<HealthResponse>) {
    match storage.ping().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse { status: "ok" })),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable",
                }),
            )
        }
    }
}

pub fn router() -> Router<Storage> {
    Router::new().route("/health", get(health))
}
