//! HTTP error mapping.
//!
//! Every handler returns `Result<_, AppError>`; the error renders as the
//! failure envelope with a status derived from the service error kind.

use crate::response::ApiResponse;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};
use razorlog_core::{ErrorKind, ServiceError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Application-level error type for the API.
#[derive(Debug)]
pub enum AppError {
    /// Core use-case failure.
    Service(ServiceError),
    /// Malformed id, query or body.
    BadRequest(String),
    /// Failure outside the core (e.g. a panicked blocking task).
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Service(err) => match err.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::DanglingReference | ErrorKind::ValidationFailure => {
                    StatusCode::BAD_REQUEST
                }
                ErrorKind::BackendUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Service(err) => write!(f, "{err}"),
            Self::BadRequest(message) => write!(f, "bad request: {message}"),
            Self::Internal(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Service(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(value: PathRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(value: QueryRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                "event=request_error module=http status=error http_status={} error={}",
                status.as_u16(),
                self
            );
        } else {
            warn!(
                "event=request_error module=http status=rejected http_status={} error={}",
                status.as_u16(),
                self
            );
        }

        (status, ApiResponse::failure(self.to_string())).into_response()
    }
}

/// Result type alias for handlers.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

#[cfg(test)]
mod tests {
    use super::AppError;
    use axum::http::StatusCode;
    use razorlog_core::{EntityKind, ServiceError};

    #[test]
    fn service_kinds_map_to_status_codes() {
        let cases = [
            (
                ServiceError::NotFound {
                    entity: EntityKind::Razor,
                    id: 1,
                },
                StatusCode::NOT_FOUND,
            ),
            (
                ServiceError::DanglingReference {
                    entity: EntityKind::Blade,
                    id: 1,
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::BackendUnavailable("disk full".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError::from(err).status(), expected);
        }
        assert_eq!(
            AppError::BadRequest("id".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
