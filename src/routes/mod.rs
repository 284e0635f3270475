//! HTTP route handlers for the calculator API.
//!
//! All endpoints live under `/api` and speak JSON. Calculation and history
//! responses are stateful per request, so the whole group carries a
//! `Cache-Control: no-store` header. CORS is wide open: the API is consumed
//! directly by browser frontends on other origins.
//!
//! Request tracing is enabled via middleware that generates a unique request
//! ID for each incoming request, allowing correlation of all logs within a
//! request.

pub mod calculate;
pub mod health;
pub mod history;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_API;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the Axum router with all routes, CORS, and cache headers.
pub fn create_router(state: AppState) -> Router {
    // Calculation and history - stateful, never cached
    let api_routes = Router::new()
        .route("/api/calculate", post(calculate::submit))
        .route(
            "/api/history",
            get(history::list).delete(history::clear),
        )
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_API),
        ));

    // Health check - always fresh for liveness probes
    let health_routes = Router::new().route("/api/health", get(health::health));

    Router::new()
        .merge(api_routes)
        .merge(health_routes)
        .with_state(state)
        // Browser frontends call the API cross-origin
        .layer(CorsLayer::permissive())
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
