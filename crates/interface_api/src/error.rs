//! API error handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use core_kernel::{ErrorKind, Failure};
use serde::Serialize;
use thiserror::Error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// A failed entity operation, rendered with its kind
    #[error("{}", .0.message)]
    Access(Failure),

    /// The request body could not be read as the expected JSON
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorKind::NotFound.as_str(), msg.clone()),
            ApiError::Access(failure) => (
                StatusCode::from_u16(failure.kind.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                failure.kind.as_str(),
                failure.message.clone(),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", "Unauthorized".to_string()),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg.clone()),
        };

        let details = match &self {
            ApiError::Validation(msg) => Some(msg.split(", ").map(str::to_string).collect()),
            _ => None,
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<Failure> for ApiError {
    fn from(failure: Failure) -> Self {
        ApiError::Access(failure)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let codes: Vec<&str> = errors.iter().map(|e| &*e.code).collect();
                format!("{}: {}", field, codes.join("|"))
            })
            .collect();
        fields.sort();
        ApiError::Validation(fields.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{AccessError, EntityId};

    #[test]
    fn test_failure_keeps_kind_status() {
        let failure = Failure::from(&AccessError::MissingIdentity { entity: "region" });
        let response = ApiError::from(failure).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let failure = Failure::from(&AccessError::unavailable("pool timed out"));
        let response = ApiError::from(failure).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_access_error_display() {
        let failure = Failure::from(&AccessError::AlreadyExists {
            entity: "region",
            id: EntityId::new(1),
        });
        assert_eq!(
            ApiError::from(failure).to_string(),
            "A new region cannot already have an ID (1)"
        );
    }
}
