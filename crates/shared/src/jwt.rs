//! JWT token generation and validation.
//!
//! Provides JWT handling with access and refresh tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{Claims, TokenKind};
use crate::config::JwtSettings;

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    pub access_token_expires_secs: i64,
    /// Refresh token expiration in seconds.
    pub refresh_token_expires_secs: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            access_token_expires_secs: 900,
            refresh_token_expires_secs: 604_800,
        }
    }
}

impl From<&JwtSettings> for JwtConfig {
    fn from(settings: &JwtSettings) -> Self {
        Self {
            secret: settings.secret.clone(),
            access_token_expires_secs: i64::try_from(settings.access_token_expiry_secs)
                .unwrap_or(i64::MAX),
            refresh_token_expires_secs: i64::try_from(settings.refresh_token_expiry_secs)
                .unwrap_or(i64::MAX),
        }
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token decoding failed.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// Token is of the wrong kind for this use.
    #[error("wrong token kind")]
    WrongKind,
}

/// JWT service for token operations.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expires_secs", &self.config.access_token_expires_secs)
            .field("refresh_token_expires_secs", &self.config.refresh_token_expires_secs)
            .field("secret", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Creates a new JWT service with the given configuration.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Generates an access token for a user.
    pub fn generate_access_token(
        &self,
        user_id: Uuid,
        branch_id: Uuid,
        role: &str,
    ) -> Result<String, JwtError> {
        let expires_at = Utc::now() + Duration::seconds(self.config.access_token_expires_secs);
        self.encode(&Claims::new(
            user_id,
            branch_id,
            role,
            TokenKind::Access,
            expires_at,
        ))
    }

    /// Generates a refresh token for a user.
    pub fn generate_refresh_token(
        &self,
        user_id: Uuid,
        branch_id: Uuid,
        role: &str,
    ) -> Result<String, JwtError> {
        let expires_at = Utc::now() + Duration::seconds(self.config.refresh_token_expires_secs);
        self.encode(&Claims::new(
            user_id,
            branch_id,
            role,
            TokenKind::Refresh,
            expires_at,
        ))
    }

    fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Validates and decodes a token of any kind.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired, or
    /// `JwtError::DecodingError` if it is malformed or wrongly signed.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::default();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }

    /// Validates a token and checks that it has the expected kind.
    pub fn validate_kind(&self, token: &str, kind: TokenKind) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.kind == kind {
            Ok(claims)
        } else {
            Err(JwtError::WrongKind)
        }
    }

    /// Returns the access token expiration in seconds.
    #[must_use]
    pub const fn access_token_expires_in(&self) -> i64 {
        self.config.access_token_expires_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            access_token_expires_secs: 900,
            refresh_token_expires_secs: 3600,
        })
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let service = create_test_service();
        let user_id = Uuid::new_v4();
        let branch_id = Uuid::new_v4();

        let token = service
            .generate_access_token(user_id, branch_id, "admin")
            .unwrap();
        let claims = service.validate_kind(&token, TokenKind::Access).unwrap();

        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.branch_id(), branch_id);
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let service = create_test_service();
        let token = service
            .generate_refresh_token(Uuid::new_v4(), Uuid::new_v4(), "staff")
            .unwrap();

        assert!(matches!(
            service.validate_kind(&token, TokenKind::Access),
            Err(JwtError::WrongKind)
        ));
        assert!(service.validate_kind(&token, TokenKind::Refresh).is_ok());
    }

    #[test]
    fn test_expired_token() {
        let service = JwtService::new(JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            access_token_expires_secs: -3600,
            refresh_token_expires_secs: 3600,
        });
        let token = service
            .generate_access_token(Uuid::new_v4(), Uuid::new_v4(), "staff")
            .unwrap();

        assert!(matches!(
            service.validate_token(&token),
            Err(JwtError::Expired)
        ));
    }

    #[test]
    fn test_token_signed_with_other_secret() {
        let other = JwtService::new(JwtConfig {
            secret: "another-secret".to_string(),
            ..JwtConfig::default()
        });
        let token = other
            .generate_access_token(Uuid::new_v4(), Uuid::new_v4(), "admin")
            .unwrap();

        assert!(create_test_service().validate_token(&token).is_err());
    }

    #[test]
    fn test_invalid_token() {
        let service = create_test_service();
        assert!(service.validate_token("invalid.token.here").is_err());
    }
}
