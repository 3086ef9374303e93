//! Failure envelope and status mapping for the HTTP layer

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::core::RoombookError;

/// A classified failure rendered as a `{success: false, message}` envelope.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Underlying detail, attached only when debug errors are enabled
    pub detail: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            detail: None,
        }
    }

    /// Map an engine error onto an HTTP status and safe message.
    ///
    /// Classified failures carry their own human-readable message.
    /// Unclassified ones are reported generically, with the underlying
    /// detail exposed only when `debug_errors` is set.
    pub fn from_error(err: RoombookError, debug_errors: bool) -> Self {
        let (status, generic) = match &err {
            RoombookError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, false),
            RoombookError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, false),
            RoombookError::NavigationTimeout(_) => (StatusCode::GATEWAY_TIMEOUT, false),
            RoombookError::ElementInteraction(_) | RoombookError::Submission(_) => {
                (StatusCode::BAD_GATEWAY, false)
            }
            RoombookError::Chat(_) => (StatusCode::BAD_GATEWAY, false),
            RoombookError::AgentBrowserNotFound => (StatusCode::INTERNAL_SERVER_ERROR, false),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, true),
        };

        if generic {
            Self {
                status,
                message: "Request failed unexpectedly".to_string(),
                detail: debug_errors.then(|| err.to_string()),
            }
        } else {
            Self {
                status,
                message: err.to_string(),
                detail: None,
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "success": false,
            "message": self.message,
        });
        if let Some(detail) = self.detail {
            body["detail"] = json!(detail);
        }
        (self.status, Json(body)).into_response()
    }
}
