//! Signed, time-limited admin session tokens (HS256 JWT).

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

const ADMIN_ROLE: &str = "admin";
const ISSUER: &str = "nespak-backend";

/// JWT claims carried by an admin token.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AdminClaims {
    iss: String,
    sub: String,
    iat: i64,
    exp: i64,
    role: String,
}

/// A freshly issued token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// The admin identity proven by a valid token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies admin tokens with a shared secret.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: TimeDelta,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::hours(1)),
        }
    }

    pub fn issue(&self, username: &str) -> Result<IssuedToken, AppError> {
        let now = Utc::now();
        let expires_at = now + self.ttl;
        let claims = AdminClaims {
            iss: ISSUER.to_string(),
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            role: ADMIN_ROLE.to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to sign admin token: {}", e)))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Check signature, issuer, expiry and role.
    pub fn verify(&self, token: &str) -> Result<AdminSession, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        let claims = decode::<AdminClaims>(token, &self.decoding, &validation)?.claims;
        if claims.role != ADMIN_ROLE {
            return Err(AppError::Unauthorized(format!(
                "Invalid token role: {}",
                claims.role
            )));
        }

        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| AppError::Unauthorized("Invalid token expiry".to_string()))?;

        Ok(AdminSession {
            username: claims.sub,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-secret", Duration::from_secs(600))
    }

    #[test]
    fn test_issue_then_verify() {
        let tokens = issuer();
        let issued = tokens.issue("admin").unwrap();
        let session = tokens.verify(&issued.token).unwrap();

        assert_eq!(session.username, "admin");
        assert_eq!(session.expires_at.timestamp(), issued.expires_at.timestamp());
        assert!(issued.expires_at > Utc::now());
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let issued = TokenIssuer::new("other-secret", Duration::from_secs(600))
            .issue("admin")
            .unwrap();
        let err = issuer().verify(&issued.token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let past = Utc::now().timestamp() - 120;
        let claims = AdminClaims {
            iss: ISSUER.to_string(),
            sub: "admin".to_string(),
            iat: past - 60,
            exp: past,
            role: ADMIN_ROLE.to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(issuer().verify(&token).is_err());
    }

    #[test]
    fn test_wrong_role_is_rejected() {
        let claims = AdminClaims {
            iss: ISSUER.to_string(),
            sub: "member".to_string(),
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 600,
            role: "member".to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(issuer().verify(&token).is_err());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(issuer().verify("not-a-jwt").is_err());
    }
}
