//! Liveness endpoint.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"healthy"` while the process serves requests.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Creates the health route. It needs no database and no token.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
