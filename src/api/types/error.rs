//! API error type with a flat `{ "error": "..." }` body

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::DomainError;

/// Error body returned by every endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    pub fn gateway_timeout(message: impl Into<String>) -> Self {
        Self::new(StatusCode::GATEWAY_TIMEOUT, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorResponse {
            error: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let message = err.public_message();

        match &err {
            DomainError::NotFound { .. } => Self::not_found(message),
            DomainError::Validation { .. } => Self::bad_request(message),
            DomainError::ConfigurationMissing { .. } => Self::unavailable(message),
            DomainError::UpstreamHttp { status, .. } => {
                match StatusCode::from_u16(*status) {
                    Ok(code) if code.is_client_error() || code.is_server_error() => {
                        Self::new(code, message)
                    }
                    _ => Self::bad_gateway(message),
                }
            }
            DomainError::UpstreamTransport { timed_out: true, .. } => {
                Self::gateway_timeout(message)
            }
            DomainError::UpstreamTransport { .. } => Self::bad_gateway(message),
            DomainError::Storage { .. } | DomainError::Internal { .. } => {
                error!(error = %err, "Request failed");
                Self::internal(message)
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_missing_is_503() {
        let api_err: ApiError = DomainError::configuration_missing().into();
        assert_eq!(api_err.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(api_err.message, crate::domain::error::SERVICE_NOT_CONFIGURED);
    }

    #[test]
    fn test_upstream_status_is_forwarded() {
        let api_err: ApiError = DomainError::upstream_http(429, "slow down").into();
        assert_eq!(api_err.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(api_err.message, "Workflow API error: 429");
    }

    #[test]
    fn test_non_error_upstream_status_is_bad_gateway() {
        let api_err: ApiError = DomainError::upstream_http(302, "").into();
        assert_eq!(api_err.status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_transport_errors() {
        let refused: ApiError = DomainError::upstream_transport("connection refused", false).into();
        assert_eq!(refused.status, StatusCode::BAD_GATEWAY);

        let timed_out: ApiError = DomainError::upstream_transport("timed out", true).into();
        assert_eq!(timed_out.status, StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_storage_error_is_hidden() {
        let api_err: ApiError = DomainError::storage("disk on fire at /var/data").into();
        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_err.message, "Internal server error");
    }

    #[test]
    fn test_error_serialization() {
        let body = ApiErrorResponse {
            error: "Message is required".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"error":"Message is required"}"#
        );
    }
}
