//! API error types with HTTP response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use service::ServiceError;

/// Message returned to clients when a health call could not be recorded.
pub const HEALTH_CHECK_FAILED: &str = "failed to record health check";

/// Error body shared by all failing endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// The health service failed; details are logged, not returned.
    HealthCheck(ServiceError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::HealthCheck(err) => {
                tracing::error!(error = %err, "error handling health check");
                (StatusCode::INTERNAL_SERVER_ERROR, HEALTH_CHECK_FAILED)
            }
        };

        let body = ErrorResponse {
            status: "error",
            error: Some(message),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::HealthCheck(err)
    }
}
