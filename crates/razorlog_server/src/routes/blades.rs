//! `/api/v1/blades` handlers.

use super::{entity_id, page_request, ListParams};
use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use razorlog_core::{Blade, CreateBladeRequest, EntityId, Page, UpdateBladeRequest};

pub(super) async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateBladeRequest>, JsonRejection>,
) -> ApiResult<Blade> {
    let Json(request) = payload?;
    let blade = state.run(move |service| service.create_blade(request)).await?;
    Ok(ApiResponse::ok(blade, "blade created"))
}

pub(super) async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Page<Blade>> {
    let request = page_request(query)?;
    let page = state.run(move |service| service.list_blades(request)).await?;
    Ok(ApiResponse::ok(page, "blades listed"))
}

pub(super) async fn show(
    State(state): State<AppState>,
    path: Result<Path<EntityId>, PathRejection>,
) -> ApiResult<Blade> {
    let id = entity_id(path)?;
    let blade = state.run(move |service| service.get_blade(id)).await?;
    Ok(ApiResponse::ok(blade, "blade loaded"))
}

pub(super) async fn update(
    State(state): State<AppState>,
    path: Result<Path<EntityId>, PathRejection>,
    payload: Result<Json<UpdateBladeRequest>, JsonRejection>,
) -> ApiResult<Blade> {
    let id = entity_id(path)?;
    let Json(request) = payload?;
    let blade = state
        .run(move |service| service.update_blade(id, request))
        .await?;
    Ok(ApiResponse::ok(blade, "blade updated"))
}

pub(super) async fn delete(
    State(state): State<AppState>,
    path: Result<Path<EntityId>, PathRejection>,
) -> ApiResult<()> {
    let id = entity_id(path)?;
    state.run(move |service| service.delete_blade(id)).await?;
    Ok(ApiResponse::done("blade deleted"))
}
