//! One access-log line per request.

use super::request_id::REQUEST_ID_HEADER;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use log::{info, warn};
use std::time::Instant;

pub async fn request_log_middleware(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let response = next.run(request).await;

    let status = response.status();
    let latency_ms = started_at.elapsed().as_millis();
    if status.is_server_error() {
        warn!(
            "event=http_request module=http status=error method={} path={} http_status={} latency_ms={} request_id={}",
            method,
            path,
            status.as_u16(),
            latency_ms,
            request_id
        );
    } else {
        info!(
            "event=http_request module=http status=ok method={} path={} http_status={} latency_ms={} request_id={}",
            method,
            path,
            status.as_u16(),
            latency_ms,
            request_id
        );
    }
    response
}
