//! JWT verification
//!
//! Tokens are issued by the identity service; this service only verifies
//! them. `create_token` exists for tests and operator tooling.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// HS256 secret shared with the identity service
    pub secret: String,
    /// Lifetime of tokens minted by `create_token`
    pub expiration_hours: i64,
    /// Expected `iss` claim
    pub issuer: String,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours: 24,
            issuer: issuer.into(),
        }
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"***")
            .field("expiration_hours", &self.expiration_hours)
            .field("issuer", &self.issuer)
            .finish()
    }
}

/// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    pub username: String,
    /// Account role ("guest", "staff", "admin")
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    pub iss: String,
}

impl Claims {
    pub fn new(account_id: &str, username: &str, role: &str, config: &JwtConfig) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(config.expiration_hours);

        Self {
            sub: account_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }
}

/// Sign a token the way the identity service does
pub fn create_token(
    account_id: &str,
    username: &str,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims::new(account_id, username, role, config);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify signature, expiry and issuer, and decode the claims
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Claims, AuthError> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    })
}

/// Errors that can occur during authentication
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Missing authentication token")]
    MissingToken,
    #[error("Invalid authentication token")]
    InvalidToken,
    #[error("Token has expired")]
    ExpiredToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig::new("test-secret", "hotel-identity")
    }

    #[test]
    fn test_create_and_verify_token() {
        let config = config();
        let token = create_token("acc-123", "ann", "guest", &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "acc-123");
        assert_eq!(claims.username, "ann");
        assert_eq!(claims.role, "guest");
        assert_eq!(claims.iss, "hotel-identity");
    }

    #[test]
    fn test_invalid_token() {
        assert_eq!(
            verify_token("invalid-token", &config()).unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[test]
    fn test_foreign_issuer_and_secret_rejected() {
        let other_issuer = JwtConfig::new("test-secret", "someone-else");
        let token = create_token("acc-1", "ann", "guest", &other_issuer).unwrap();
        assert_eq!(
            verify_token(&token, &config()).unwrap_err(),
            AuthError::InvalidToken
        );

        let other_secret = JwtConfig::new("another-secret", "hotel-identity");
        let token = create_token("acc-1", "ann", "guest", &other_secret).unwrap();
        assert!(verify_token(&token, &config()).is_err());
    }

    #[test]
    fn test_expired_token() {
        let mut expired = config();
        expired.expiration_hours = -2;
        let token = create_token("acc-1", "ann", "guest", &expired).unwrap();
        assert_eq!(
            verify_token(&token, &config()).unwrap_err(),
            AuthError::ExpiredToken
        );
    }
}
