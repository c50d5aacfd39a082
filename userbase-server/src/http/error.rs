//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::StoreError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Malformed request: bad id, body or query (400)
    BadRequest { message: String },

    /// Resource not found (404)
    NotFound { message: &'static str },

    /// Unique constraint hit (409)
    Conflict { message: &'static str },

    /// Store call exceeded its deadline (504)
    Timeout { operation: &'static str },

    /// Internal error (500). Already logged where it was detected.
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(e) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "validation_error",
                    "message": e.to_string()
                }),
            ),
            Self::BadRequest { message } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "bad_request",
                    "message": message
                }),
            ),
            Self::NotFound { message } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "not_found",
                    "message": message
                }),
            ),
            Self::Conflict { message } => (
                StatusCode::CONFLICT,
                json!({
                    "error": "conflict",
                    "message": message
                }),
            ),
            Self::Timeout { operation } => {
                tracing::warn!(operation, "store call timed out");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    json!({
                        "error": "timeout",
                        "message": format!("{} timed out", operation)
                    }),
                )
            }
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "internal_error",
                    "message": "an internal error occurred"
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        if e.is_input_error() {
            tracing::debug!(error = %e, "store rejected input");
        }
        match e {
            StoreError::InvalidId => Self::BadRequest {
                message: "invalid user ID".into(),
            },
            StoreError::InvalidPage => Self::BadRequest {
                message: "page must be 1 or greater".into(),
            },
            StoreError::InvalidPageSize => Self::BadRequest {
                message: "page_size must be between 1 and 100".into(),
            },
            StoreError::NotFound => Self::NotFound {
                message: "user not found",
            },
            StoreError::DuplicateEmail => Self::Conflict {
                message: "email already exists",
            },
            StoreError::Internal { .. } => Self::Internal,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::BadRequest {
            message: format!("invalid request body: {}", e.body_text()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        Self::BadRequest {
            message: format!("invalid query parameters: {}", e.body_text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    fn internal() -> StoreError {
        StoreError::Internal {
            operation: "get user by id",
            source: sqlx::Error::PoolTimedOut,
        }
    }

    #[tokio::test]
    async fn validation_error_is_400() {
        let err = ApiError::Validation(ValidationError::Empty { field: "email" });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_errors_map_to_status() {
        let cases = [
            (StoreError::InvalidId, StatusCode::BAD_REQUEST),
            (StoreError::InvalidPage, StatusCode::BAD_REQUEST),
            (StoreError::InvalidPageSize, StatusCode::BAD_REQUEST),
            (StoreError::NotFound, StatusCode::NOT_FOUND),
            (StoreError::DuplicateEmail, StatusCode::CONFLICT),
            (internal(), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), status);
        }
    }

    #[test]
    fn only_input_errors_become_bad_request() {
        let cases = [
            StoreError::InvalidId,
            StoreError::InvalidPage,
            StoreError::InvalidPageSize,
            StoreError::NotFound,
            StoreError::DuplicateEmail,
            internal(),
        ];
        for err in cases {
            let input = err.is_input_error();
            let status = ApiError::from(err).into_response().status();
            assert_eq!(input, status == StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn internal_error_hides_cause() {
        let response = ApiError::from(internal()).into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("an internal error occurred"));
        assert!(!text.contains("pool timed out"));
    }

    #[tokio::test]
    async fn timeout_is_504() {
        let err = ApiError::Timeout {
            operation: "list users",
        };
        assert_eq!(err.into_response().status(), StatusCode::GATEWAY_TIMEOUT);
    }
}
