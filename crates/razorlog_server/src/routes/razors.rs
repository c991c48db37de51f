//! `/api/v1/razors` handlers.

use super::{entity_id, page_request, ListParams};
use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use razorlog_core::{CreateRazorRequest, EntityId, Page, Razor, UpdateRazorRequest};

pub(super) async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateRazorRequest>, JsonRejection>,
) -> ApiResult<Razor> {
    let Json(request) = payload?;
    let razor = state.run(move |service| service.create_razor(request)).await?;
    Ok(ApiResponse::ok(razor, "razor created"))
}

pub(super) async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Page<Razor>> {
    let request = page_request(query)?;
    let page = state.run(move |service| service.list_razors(request)).await?;
    Ok(ApiResponse::ok(page, "razors listed"))
}

pub(super) async fn show(
    State(state): State<AppState>,
    path: Result<Path<EntityId>, PathRejection>,
) -> ApiResult<Razor> {
    let id = entity_id(path)?;
    let razor = state.run(move |service| service.get_razor(id)).await?;
    Ok(ApiResponse::ok(razor, "razor loaded"))
}

pub(super) async fn update(
    State(state): State<AppState>,
    path: Result<Path<EntityId>, PathRejection>,
    payload: Result<Json<UpdateRazorRequest>, JsonRejection>,
) -> ApiResult<Razor> {
    let id = entity_id(path)?;
    let Json(request) = payload?;
    let razor = state
        .run(move |service| service.update_razor(id, request))
        .await?;
    Ok(ApiResponse::ok(razor, "razor updated"))
}

pub(super) async fn delete(
    State(state): State<AppState>,
    path: Result<Path<EntityId>, PathRejection>,
) -> ApiResult<()> {
    let id = entity_id(path)?;
    state.run(move |service| service.delete_razor(id)).await?;
    Ok(ApiResponse::done("razor deleted"))
}
