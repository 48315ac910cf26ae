use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Structured JSON error response used by all endpoints.
pub struct ApiErrorType {
    pub status: StatusCode,
    pub message: String,
    pub detail: Option<String>,
}

impl From<(StatusCode, &str, Option<String>)> for ApiErrorType {
    fn from((status, message, detail): (StatusCode, &str, Option<String>)) -> Self {
        Self {
            status,
            message: message.to_string(),
            detail,
        }
    }
}

impl IntoResponse for ApiErrorType {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": self.message,
                "detail": self.detail,
            })),
        )
            .into_response()
    }
}
