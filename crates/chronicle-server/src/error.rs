//! Error handling for the REST API server.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chronicle_core::ChronicleError;
use serde::Serialize;
use std::fmt;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    // Common error constructors
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.status, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        };

        (self.status, Json(body)).into_response()
    }
}

// Convert from chronicle-core errors
impl From<ChronicleError> for ApiError {
    fn from(err: ChronicleError) -> Self {
        match err {
            ChronicleError::NotFound { message, .. } => ApiError::not_found(message),
            ChronicleError::Validation {
                message, details, ..
            } => {
                let api = ApiError::validation(message);
                match serde_json::to_value(details) {
                    Ok(details) => api.with_details(details),
                    Err(_) => api,
                }
            }
            ChronicleError::Configuration(msg) => ApiError::internal(msg),
            ChronicleError::Database { message, .. } => {
                ApiError::internal(format!("Database error: {}", message))
            }
            ChronicleError::Parse { message, .. } => {
                ApiError::internal(format!("Parse error: {}", message))
            }
            ChronicleError::Serialization(e) => {
                ApiError::internal(format!("Serialization error: {}", e))
            }
            ChronicleError::Io(e) => ApiError::internal(format!("IO error: {}", e)),
            ChronicleError::Internal(msg) => ApiError::internal(msg),
        }
    }
}

// Unreadable request bodies keep axum's status but use the JSON error shape.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(rejection.status(), "INVALID_BODY", rejection.body_text())
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chronicle_core::FieldErrors;

    #[test]
    fn test_not_found_maps_to_404() {
        let api = ApiError::from(ChronicleError::not_found(3));
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.code, "NOT_FOUND");
    }

    #[test]
    fn test_validation_keeps_field_details() {
        let mut details = FieldErrors::new();
        details.insert("title".to_string(), vec!["Title can't be blank".to_string()]);
        let api = ApiError::from(ChronicleError::invalid_fields(details));

        assert_eq!(api.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            api.details.unwrap()["title"][0],
            serde_json::json!("Title can't be blank")
        );
    }

    #[test]
    fn test_database_failure_is_internal() {
        let api = ApiError::from(ChronicleError::database("disk full"));
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(api.message.contains("disk full"));
    }
}
