//! Liveness endpoint.

use crate::response::ApiResponse;
use crate::state::AppState;
use axum::extract::State;
use chrono::{DateTime, Utc};
use razorlog_core::{core_version, BackendKind};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    /// Which store is serving requests (`durable` or `fallback`).
    pub backend: BackendKind,
    /// `razorlog_core` crate version.
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}

pub async fn health(State(state): State<AppState>) -> ApiResponse<HealthStatus> {
    ApiResponse::ok(
        HealthStatus {
            status: "healthy",
            backend: state.backend_kind(),
            version: core_version(),
            timestamp: Utc::now(),
        },
        "service is running",
    )
}
