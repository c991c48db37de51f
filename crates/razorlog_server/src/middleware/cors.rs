//! CORS policy for the local frontend dev servers.

use super::request_id::REQUEST_ID_HEADER;
use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::CorsLayer;

const FRONTEND_HOSTS: &[&str] = &["localhost", "127.0.0.1"];
const FRONTEND_PORTS: &[u16] = &[3000, 3001, 3002];

/// Allows the frontend on ports 3000-3002 of localhost/127.0.0.1.
pub fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = FRONTEND_HOSTS
        .iter()
        .flat_map(|host| {
            FRONTEND_PORTS
                .iter()
                .map(move |port| format!("http://{host}:{port}"))
        })
        .filter_map(|origin| HeaderValue::from_str(&origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::CONTENT_LENGTH,
            header::ACCEPT_ENCODING,
            header::AUTHORIZATION,
        ])
        .expose_headers([
            header::CONTENT_LENGTH,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .allow_credentials(true)
}
