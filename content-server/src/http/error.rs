//! API error types with IntoResponse
//!
//! Client mistakes become `fail` envelopes, everything else an `error`
//! envelope. Store errors are logged in full and answered with the service
//! error's own message, never the driver text.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::response;
use crate::service::ServiceError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Body was not valid JSON for the endpoint (400)
    InvalidBody,

    /// Method not served on this path (405)
    MethodNotAllowed,

    /// Failure reported by the content service (400 or 500)
    Service(ServiceError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidBody => response::fail(StatusCode::BAD_REQUEST, "invalid request body"),
            Self::MethodNotAllowed => {
                response::fail(StatusCode::METHOD_NOT_ALLOWED, "invalid request method")
            }
            Self::Service(e) if e.is_client_error() => {
                tracing::debug!(error = %e, "rejected content request");
                response::fail(StatusCode::BAD_REQUEST, e.to_string())
            }
            Self::Service(e) => {
                match &e {
                    ServiceError::Repository(source) => {
                        tracing::error!(error = %source, "content store error");
                    }
                    other => tracing::error!(error = %other, "content service error"),
                }
                response::error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        Self::Service(e)
    }
}
