//! Error types for pack calculation and the HTTP layer.
//!
//! [`PackError`] is the core taxonomy: every failure the solvers, the registry
//! or the service can report. [`ApiError`] wraps it for the transport layer and
//! knows how to turn itself into an HTTP response.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Failures of the calculation core.
///
/// All variants are deterministic and non-retryable; the caller receives
/// them unchanged and no state is modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackError {
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Invalid pack size configuration: {0}")]
    InvalidConfig(String),

    #[error("No pack combination reaches quantity {quantity}")]
    NoSolution { quantity: u64 },
}

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
        }
    }
}

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Pack(#[from] PackError),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error("Invalid Content-Type. Expected application/json")]
    UnsupportedMediaType,

    #[error("Forbidden: Access from this origin is not allowed")]
    Forbidden,

    #[error("Unauthorized: Invalid authorization token")]
    Unauthorized,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Pack(PackError::InvalidQuantity(_) | PackError::InvalidConfig(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Pack(PackError::NoSolution { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ApiError::Pack(PackError::InvalidQuantity(_)) => "Invalid quantity",
            ApiError::Pack(PackError::InvalidConfig(_)) => "Invalid pack sizes",
            ApiError::Pack(PackError::NoSolution { .. }) => "No solution",
            ApiError::BadRequest(_) => "Invalid input",
            ApiError::UnsupportedMediaType => "Unsupported media type",
            ApiError::Forbidden => "Forbidden",
            ApiError::Unauthorized => "Unauthorized",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {self}");
        } else {
            tracing::debug!(status = status.as_u16(), "Request rejected: {self}");
        }

        (status, Json(ErrorResponse::new(self.label(), self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_client_errors() {
        assert_eq!(
            ApiError::from(PackError::InvalidQuantity("0".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(PackError::InvalidConfig("empty".into())).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn missing_solution_is_a_server_error() {
        let err = ApiError::from(PackError::NoSolution { quantity: 42 });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "No pack combination reaches quantity 42");
    }

    #[test]
    fn transport_errors_keep_their_status_codes() {
        assert_eq!(
            ApiError::UnsupportedMediaType.status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
    }
}
