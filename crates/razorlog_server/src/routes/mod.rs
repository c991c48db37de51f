//! Route table for the JSON API.

mod blades;
mod health;
mod razors;
mod stats;
mod usage_records;

use crate::error::AppError;
use crate::state::AppState;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::routing::get;
use axum::Router;
use razorlog_core::{EntityId, PageRequest};
use serde::{Deserialize, Deserializer};

pub use health::health;

/// Largest accepted `page_size` query value.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Routes mounted under `/api/v1`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/razors", get(razors::list).post(razors::create))
        .route(
            "/razors/{id}",
            get(razors::show).put(razors::update).delete(razors::delete),
        )
        .route("/blades", get(blades::list).post(blades::create))
        .route(
            "/blades/{id}",
            get(blades::show).put(blades::update).delete(blades::delete),
        )
        .route(
            "/usage-records",
            get(usage_records::list).post(usage_records::create),
        )
        .route(
            "/usage-records/{id}",
            get(usage_records::show)
                .put(usage_records::update)
                .delete(usage_records::delete),
        )
        .route("/dashboard", get(stats::dashboard))
        .route("/statistics", get(stats::statistics))
}

/// `?page=&page_size=` query; zero, empty or absent values use the core defaults.
#[derive(Debug, Default, Deserialize)]
struct ListParams {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    page: Option<u32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    page_size: Option<u32>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

fn page_request(query: Result<Query<ListParams>, QueryRejection>) -> Result<PageRequest, AppError> {
    let Query(params) = query?;
    let page_size = params.page_size.unwrap_or(0);
    if page_size > MAX_PAGE_SIZE {
        return Err(AppError::BadRequest(format!(
            "page_size must be at most {MAX_PAGE_SIZE}, got {page_size}"
        )));
    }
    Ok(PageRequest::new(params.page.unwrap_or(0), page_size))
}

fn entity_id(path: Result<Path<EntityId>, PathRejection>) -> Result<EntityId, AppError> {
    let Path(id) = path?;
    if id < 1 {
        return Err(AppError::BadRequest(format!("invalid id parameter: {id}")));
    }
    Ok(id)
}
