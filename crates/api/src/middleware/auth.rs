//! Authentication middleware for protected routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use farmstead_core::auth::UserRole;
use farmstead_shared::{
    Claims, JwtError, TokenKind,
    types::{BranchId, UserId},
};
use serde_json::json;

use crate::{AppState, error::ApiError};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authentication middleware that validates access tokens.
///
/// Valid claims are stored in the request extensions for [`AuthUser`].
/// Refresh tokens are rejected here; they are only accepted by
/// `POST /auth/refresh`.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "missing_token",
                "message": "Authorization header with Bearer token is required"
            })),
        )
            .into_response();
    };

    match state.jwt_service.validate_kind(token, TokenKind::Access) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            let (error, message) = match e {
                JwtError::Expired => ("token_expired", "Token has expired"),
                _ => ("invalid_token", "Invalid or malformed token"),
            };

            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": error, "message": message })),
            )
                .into_response()
        }
    }
}

/// Claims of the authenticated caller.
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> ApiResult<Json<Value>> {
///     auth.require_admin()?;
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the caller's user ID.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        UserId::from_uuid(self.0.user_id())
    }

    /// Returns the caller's branch ID.
    #[must_use]
    pub fn branch_id(&self) -> BranchId {
        BranchId::from_uuid(self.0.branch_id())
    }

    /// Returns the caller's role. Unknown role strings count as staff.
    #[must_use]
    pub fn role(&self) -> UserRole {
        self.0.role.parse().unwrap_or_default()
    }

    /// Returns true for administrators.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role().can_manage()
    }

    /// Rejects non-administrators with 403.
    ///
    /// # Errors
    ///
    /// Returns a forbidden error for staff callers.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::forbidden("Administrator role required"))
        }
    }

    /// Allows administrators and the user themselves.
    ///
    /// # Errors
    ///
    /// Returns a forbidden error when a staff caller targets another user.
    pub fn require_self_or_admin(&self, user_id: UserId) -> Result<(), ApiError> {
        if self.role().can_view_all_staff() || self.user_id() == user_id {
            Ok(())
        } else {
            Err(ApiError::forbidden("Cannot access another user's records"))
        }
    }

    /// Returns the inner claims.
    #[must_use]
    pub const fn claims(&self) -> &Claims {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": "unauthorized",
                        "message": "Authentication required"
                    })),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user(role: &str) -> AuthUser {
        AuthUser(Claims {
            sub: Uuid::now_v7(),
            branch: Uuid::now_v7(),
            role: role.to_string(),
            kind: TokenKind::Access,
            iat: 0,
            exp: i64::MAX,
        })
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }

    #[test]
    fn test_role_guards() {
        assert!(user("admin").require_admin().is_ok());
        assert!(user("staff").require_admin().is_err());
        assert!(user("user").require_admin().is_err());
        assert!(user("root").require_admin().is_err());
    }

    #[test]
    fn test_self_or_admin() {
        let staff = user("staff");
        assert!(staff.require_self_or_admin(staff.user_id()).is_ok());
        assert!(staff.require_self_or_admin(UserId::new()).is_err());
        assert!(user("admin").require_self_or_admin(UserId::new()).is_ok());
    }
}
