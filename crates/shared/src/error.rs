//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Access denied.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Entity not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Business rule violation.
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Conflict (e.g., duplicate entry or dependent rows).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Request body exceeds the configured limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::BusinessRule(_) => 422,
            Self::Conflict(_) => 409,
            Self::PayloadTooLarge(_) => 413,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Conflict(_) => "CONFLICT",
            Self::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true for errors whose detail must not reach the client.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Message safe to return to API clients.
    ///
    /// Server-side failures are collapsed to a generic message; the detail
    /// belongs in the logs.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Unauthorized(m)
            | Self::Forbidden(m)
            | Self::NotFound(m)
            | Self::Validation(m)
            | Self::BusinessRule(m)
            | Self::Conflict(m)
            | Self::PayloadTooLarge(m) => m.clone(),
            Self::Database(_) | Self::Internal(_) => "Server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::Unauthorized(String::new()), 401, "UNAUTHORIZED")]
    #[case(AppError::Forbidden(String::new()), 403, "FORBIDDEN")]
    #[case(AppError::NotFound(String::new()), 404, "NOT_FOUND")]
    #[case(AppError::Validation(String::new()), 400, "VALIDATION_ERROR")]
    #[case(AppError::BusinessRule(String::new()), 422, "BUSINESS_RULE_VIOLATION")]
    #[case(AppError::Conflict(String::new()), 409, "CONFLICT")]
    #[case(AppError::PayloadTooLarge(String::new()), 413, "PAYLOAD_TOO_LARGE")]
    #[case(AppError::Database(String::new()), 500, "DATABASE_ERROR")]
    #[case(AppError::Internal(String::new()), 500, "INTERNAL_ERROR")]
    fn test_status_and_code(
        #[case] err: AppError,
        #[case] status: u16,
        #[case] code: &str,
    ) {
        assert_eq!(err.status_code(), status);
        assert_eq!(err.error_code(), code);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::NotFound("branch".into()).to_string(),
            "Not found: branch"
        );
        assert_eq!(
            AppError::Conflict("msg".into()).to_string(),
            "Conflict: msg"
        );
    }

    #[test]
    fn test_public_message_hides_server_detail() {
        let err = AppError::Database("relation \"users\" does not exist".into());
        assert!(err.is_server_error());
        assert_eq!(err.public_message(), "Server error");

        let err = AppError::Validation("Name is required".into());
        assert!(!err.is_server_error());
        assert_eq!(err.public_message(), "Name is required");
    }
}
