//! Health check endpoint for container orchestration.
//!
//! A liveness probe: it only checks that the process can respond to HTTP,
//! without touching the database.

use axum::Json;
use serde::Serialize;

/// Response body for GET /api/health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check handler.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Calculator API is running",
    })
}
