//! Authentication types for JWT and tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived token sent with every request.
    Access,
    /// Long-lived token only accepted by the refresh endpoint.
    Refresh,
}

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Branch the user belongs to.
    pub branch: Uuid,
    /// User's role.
    pub role: String,
    /// Token kind.
    pub kind: TokenKind,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        branch_id: Uuid,
        role: &str,
        kind: TokenKind,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            branch: branch_id,
            role: role.to_string(),
            kind,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the branch ID from claims.
    #[must_use]
    pub const fn branch_id(&self) -> Uuid {
        self.branch
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

/// Refresh token request.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    /// The refresh token.
    pub refresh_token: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Authenticated user info.
    pub user: UserInfo,
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Access token expiration in seconds.
    pub expires_in: i64,
}

/// Token pair returned by the refresh endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Access token expiration in seconds.
    pub expires_in: i64,
}

/// User info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Email.
    pub email: String,
    /// Role.
    pub role: String,
    /// Branch ID.
    pub branch_id: Uuid,
    /// Profile picture path.
    pub image: Option<String>,
}
