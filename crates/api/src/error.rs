//! HTTP error responses.
//!
//! Every handler error becomes `{"error": "<code>", "message": "<text>"}` with
//! the status from [`AppError::status_code`]. Server-side failures are logged
//! here and reach the client only as a generic message.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use farmstead_core::{
    auth::PasswordError, domain::ParseEnumError, reports::ReportError,
    validation::ValidationError,
};
use farmstead_db::RepoError;
use farmstead_shared::{AppError, JwtError};
use sea_orm::SqlErr;
use serde_json::json;
use tracing::error;

/// Handler result type.
pub type ApiResult<T> = Result<T, ApiError>;

/// An [`AppError`] with an optional override for the `error` field.
#[derive(Debug)]
pub struct ApiError {
    inner: AppError,
    code: Option<&'static str>,
}

impl ApiError {
    /// Replaces the default error code.
    #[must_use]
    pub const fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    /// Returns the wrapped error.
    #[must_use]
    pub const fn inner(&self) -> &AppError {
        &self.inner
    }

    /// 401 with the given message.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Unauthorized(message.into()).into()
    }

    /// 403 with the given message.
    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::Forbidden(message.into()).into()
    }

    /// 400 with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into()).into()
    }

    /// 404 with the given message.
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into()).into()
    }

    /// 500 with a detail that is logged but not returned.
    pub fn internal(detail: impl Into<String>) -> Self {
        AppError::Internal(detail.into()).into()
    }
}

impl From<AppError> for ApiError {
    fn from(inner: AppError) -> Self {
        Self { inner, code: None }
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound { entity, .. } => Self::not_found(format!("{entity} not found")),
            RepoError::Conflict(message) => AppError::Conflict(message).into(),
            RepoError::Database(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    AppError::Conflict("duplicate entry".to_string()).into()
                }
                _ => AppError::Database(e.to_string()).into(),
            },
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<ParseEnumError> for ApiError {
    fn from(err: ParseEnumError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::TooShort => Self::validation(err.to_string()),
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => Self::unauthorized("Token has expired").with_code("token_expired"),
            JwtError::DecodingError(_) | JwtError::WrongKind => {
                Self::unauthorized("Invalid or malformed token").with_code("invalid_token")
            }
            JwtError::EncodingError(e) => Self::internal(e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge("file exceeds the upload limit".to_string()).into()
        } else {
            Self::validation(err.body_text())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.inner.is_server_error() {
            error!(error = %self.inner, "request failed");
        }

        let status = StatusCode::from_u16(self.inner.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let code = self.code.unwrap_or_else(|| self.inner.error_code());

        (
            status,
            Json(json!({
                "error": code,
                "message": self.inner.public_message(),
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use uuid::Uuid;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_mapping() {
        let err: ApiError = RepoError::NotFound {
            entity: "branch",
            id: Uuid::nil(),
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "NOT_FOUND");
        assert_eq!(body["message"], "branch not found");
    }

    #[tokio::test]
    async fn test_database_detail_hidden() {
        let err: ApiError =
            RepoError::Database(sea_orm::DbErr::Custom("password=hunter2".into())).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "DATABASE_ERROR");
        assert_eq!(body["message"], "Server error");
    }

    #[tokio::test]
    async fn test_code_override() {
        let response = ApiError::unauthorized("Invalid username or password")
            .with_code("invalid_credentials")
            .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "invalid_credentials");
    }

    #[test]
    fn test_short_password_is_validation() {
        let err: ApiError = PasswordError::TooShort.into();
        assert_eq!(err.inner().status_code(), 400);
    }
}
