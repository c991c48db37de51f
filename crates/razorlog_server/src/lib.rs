//! HTTP surface for the razor and blade inventory tracker.
//!
//! # Responsibility
//! - Expose inventory use cases as JSON routes under `/api/v1`.
//! - Wrap every response in the uniform envelope and map errors to status codes.
//! - Own process configuration and middleware (request id, access log, CORS).

pub mod config;
pub mod error;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

use axum::routing::get;
use axum::Router;
use state::AppState;

/// Builds the full application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .nest("/api/v1", routes::api_routes())
        .with_state(state)
        .layer(axum::middleware::from_fn(
            middleware::request_log_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(middleware::cors_layer())
}
