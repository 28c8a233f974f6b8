//! HTTP-facing error wrapper for the gateway router.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use taskhub_core::TaskhubError;

pub struct AppError(pub TaskhubError);

impl From<TaskhubError> for AppError {
    fn from(err: TaskhubError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = match &self.0 {
            TaskhubError::Internal(err) => {
                tracing::error!(%err, "internal error");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
