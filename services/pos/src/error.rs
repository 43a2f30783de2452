//! API error taxonomy
//!
//! Every failure is converted into the uniform envelope at the handler
//! boundary. Status codes follow one policy across all controllers:
//! 422 validation, 404 not found, 401 unauthorized, 500 internal.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Error type for the POS API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Field-level validation failure; client-fixable
    #[error("Validation failed")]
    Validation(#[from] ValidationErrors),

    /// Referenced id doesn't exist
    #[error("{0}")]
    NotFound(String),

    /// Missing, invalid, or expired credentials
    #[error("Unauthorized")]
    Unauthorized,

    /// Unexpected persistence or storage failure; the message is passed
    /// through since this is an internal-facing API
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Wrap an unexpected failure, passing its message through
    pub fn internal(error: impl std::fmt::Display) -> Self {
        ApiError::Internal(error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "success": false,
                    "message": "Validation failed",
                    "data": {"errors": errors},
                }),
            ),
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                json!({
                    "success": false,
                    "message": message,
                    "data": null,
                }),
            ),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({
                    "success": false,
                    "message": "Unauthorized",
                    "data": null,
                }),
            ),
            ApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "success": false,
                    "message": message,
                    "data": null,
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for handler results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_carries_field_messages() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "Name is required");
        let error = ApiError::from(errors);

        assert!(matches!(error, ApiError::Validation(_)));
        assert_eq!(error.to_string(), "Validation failed");
    }

    #[test]
    fn test_not_found_message_passthrough() {
        let error = ApiError::NotFound("Product not found".to_string());
        assert_eq!(error.to_string(), "Product not found");
    }
}
