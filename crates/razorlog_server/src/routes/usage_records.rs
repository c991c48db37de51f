//! `/api/v1/usage-records` handlers.

use super::{entity_id, page_request, ListParams};
use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use razorlog_core::{
    CreateUsageRecordRequest, EntityId, Page, UpdateUsageRecordRequest, UsageRecord,
};

pub(super) async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateUsageRecordRequest>, JsonRejection>,
) -> ApiResult<UsageRecord> {
    let Json(request) = payload?;
    let record = state
        .run(move |service| service.create_usage_record(request))
        .await?;
    Ok(ApiResponse::ok(record, "usage record created"))
}

pub(super) async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Page<UsageRecord>> {
    let request = page_request(query)?;
    let page = state
        .run(move |service| service.list_usage_records(request))
        .await?;
    Ok(ApiResponse::ok(page, "usage records listed"))
}

pub(super) async fn show(
    State(state): State<AppState>,
    path: Result<Path<EntityId>, PathRejection>,
) -> ApiResult<UsageRecord> {
    let id = entity_id(path)?;
    let record = state
        .run(move |service| service.get_usage_record(id))
        .await?;
    Ok(ApiResponse::ok(record, "usage record loaded"))
}

pub(super) async fn update(
    State(state): State<AppState>,
    path: Result<Path<EntityId>, PathRejection>,
    payload: Result<Json<UpdateUsageRecordRequest>, JsonRejection>,
) -> ApiResult<UsageRecord> {
    let id = entity_id(path)?;
    let Json(request) = payload?;
    let record = state
        .run(move |service| service.update_usage_record(id, request))
        .await?;
    Ok(ApiResponse::ok(record, "usage record updated"))
}

pub(super) async fn delete(
    State(state): State<AppState>,
    path: Result<Path<EntityId>, PathRejection>,
) -> ApiResult<()> {
    let id = entity_id(path)?;
    state
        .run(move |service| service.delete_usage_record(id))
        .await?;
    Ok(ApiResponse::done("usage record deleted"))
}
