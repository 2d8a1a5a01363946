use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use headlines_core::article::ArticleError;

use crate::service::{service_error_to_status_code, ServiceError};

/// Error returned by article handlers.
///
/// Bodies are always `{"error": "<message>"}` with a fixed message per
/// status; the underlying cause is logged, never returned.
#[derive(Debug)]
pub enum AppError {
    Service(ServiceError),
    InvalidCategory(ArticleError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InvalidCategory(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            AppError::Service(e) => {
                let status = StatusCode::from_u16(service_error_to_status_code(e))
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                if status.is_server_error() {
                    tracing::error!(error = %e, "Request failed");
                }
                let message = match e {
                    ServiceError::NotFound(_) => "article not found",
                    ServiceError::Unavailable(_) => "service temporarily unavailable",
                    ServiceError::DataIntegrity(_) | ServiceError::Unexpected(_) => {
                        "internal server error"
                    }
                };
                (status, message.to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        AppError::Service(err)
    }
}

impl From<ArticleError> for AppError {
    fn from(err: ArticleError) -> Self {
        AppError::InvalidCategory(err)
    }
}
