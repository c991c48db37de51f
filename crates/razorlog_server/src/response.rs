//! Uniform JSON envelope for every API response.

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// `{success, data?, message, error?}` envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    /// Success without a payload (deletes).
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: message.into(),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: "operation failed".to_string(),
            error: Some(error.into()),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::ApiResponse;
    use serde_json::json;

    #[test]
    fn success_envelope_omits_error() {
        let value = serde_json::to_value(ApiResponse::ok(json!({"id": 1}), "razor created")).unwrap();
        assert_eq!(
            value,
            json!({"success": true, "data": {"id": 1}, "message": "razor created"})
        );
    }

    #[test]
    fn failure_envelope_omits_data() {
        let value = serde_json::to_value(ApiResponse::failure("razor not found: 7")).unwrap();
        assert_eq!(
            value,
            json!({"success": false, "message": "operation failed", "error": "razor not found: 7"})
        );
    }
}
