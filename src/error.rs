//! Application error types for secdesk
//!
//! This module defines the error taxonomy used throughout the application.
//! Service-layer failures are `ApiError` values carrying an HTTP status; they
//! propagate unchanged to the request boundary, where `IntoResponse` converts
//! them into the standard response envelope. All error types use `thiserror`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::server::envelope::ApiResponse;

/// Service-layer error carried to the request boundary
///
/// Each variant maps to exactly one HTTP status code. Messages are safe to
/// show to clients; internal detail belongs in the log, not the variant.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    /// Bad or missing input
    #[error("{0}")]
    Validation(String),

    /// Missing/invalid/expired token or bad credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not the resource owner
    #[error("Forbidden")]
    Forbidden,

    /// Resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Duplicate registration or similar uniqueness violation
    #[error("{0}")]
    Conflict(String),

    /// Unexpected failure; detail is logged, not exposed
    #[error("Internal Server Error")]
    Internal(String),
}

impl ApiError {
    /// Shorthand for the credential-failure error
    ///
    /// Login failures for unknown email and wrong password must be
    /// indistinguishable, so both paths go through this constructor.
    pub fn invalid_credentials() -> Self {
        ApiError::Unauthorized("Invalid credentials".to_string())
    }

    /// HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!(detail = %detail, "internal error reached request boundary");
        }
        let status = self.status();
        let body = ApiResponse::error(self.to_string(), status.as_u16());
        (status, Json(body)).into_response()
    }
}

/// Database-layer errors
#[derive(Debug, Error)]
pub enum DbError {
    /// SQLite error
    #[error("Database error: {0}")]
    Sqlite(#[from] tokio_rusqlite::Error),

    /// Record not found
    #[error("Record not found")]
    NotFound,

    /// Constraint violation (e.g. unique email)
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound => ApiError::NotFound("Record not found".to_string()),
            DbError::ConstraintViolation(msg) => ApiError::Conflict(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test 1: Each ApiError variant maps to its HTTP status
    #[test]
    fn test_api_error_status_mapping() {
        assert_eq!(
            ApiError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("no".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::NotFound("gone".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("dup".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    // Test 2: Internal errors never expose their detail in the message
    #[test]
    fn test_internal_error_hides_detail() {
        let err = ApiError::Internal("connection pool exhausted".to_string());
        assert_eq!(err.to_string(), "Internal Server Error");
    }

    // Test 3: invalid_credentials is identical regardless of the failing check
    #[test]
    fn test_invalid_credentials_uniform() {
        let missing_user = ApiError::invalid_credentials();
        let wrong_password = ApiError::invalid_credentials();
        assert_eq!(missing_user, wrong_password);
        assert_eq!(missing_user.to_string(), "Invalid credentials");
    }

    // Test 4: DbError conversions into ApiError
    #[test]
    fn test_db_error_conversion() {
        let not_found: ApiError = DbError::NotFound.into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let conflict: ApiError = DbError::ConstraintViolation("email taken".to_string()).into();
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        let internal: ApiError = DbError::Migration("v2 failed".to_string()).into();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
