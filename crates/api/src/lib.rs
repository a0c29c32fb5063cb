//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - Bearer-token authentication middleware and role guards
//! - Extractors that report bad input as JSON errors

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;

use axum::{Router, http::header::AUTHORIZATION};
use farmstead_shared::{JwtService, config::StorageConfig};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Upload directory and size limit.
    pub storage: Arc<StorageConfig>,
}

/// Creates the main application router.
///
/// Uploaded files are served read-only under `/uploads`. Every response
/// carries an `x-request-id`, and the `Authorization` header is redacted from
/// trace output.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .nest_service("/uploads", ServeDir::new(&state.storage.upload_dir))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(SetSensitiveRequestHeadersLayer::new(std::iter::once(
            AUTHORIZATION,
        )))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
