//! Dashboard and statistics handlers.

use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::state::AppState;
use axum::extract::State;
use razorlog_core::{DashboardData, UsageStatistics};

pub(super) async fn dashboard(State(state): State<AppState>) -> ApiResult<DashboardData> {
    let data = state.run(|service| service.dashboard()).await?;
    Ok(ApiResponse::ok(data, "dashboard loaded"))
}

pub(super) async fn statistics(State(state): State<AppState>) -> ApiResult<UsageStatistics> {
    let stats = state.run(|service| service.statistics()).await?;
    Ok(ApiResponse::ok(stats, "statistics loaded"))
}
