//! HS256 bearer tokens: issue and validate.
//!
//! The token's `sub` is the user id. Signature and expiry are the whole trust
//! story here; anything richer (key rotation, audiences) belongs to an
//! external identity provider.

use chrono::{Duration, Utc};
use clipshelf_core::AppError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ISSUER: &str = "clipshelf";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct JwtService {
    secret: String,
    expiry_hours: i64,
}

impl JwtService {
    pub fn new(secret: String, expiry_hours: i64) -> Self {
        Self {
            secret,
            expiry_hours,
        }
    }

    /// Issue a token for `user_id`, valid for the configured expiry window.
    pub fn issue_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.expiry_hours)).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Validate a bearer token and return the authenticated user id.
    pub fn validate_token(&self, token: &str) -> Result<Uuid, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("0123456789abcdef0123456789abcdef".to_string(), 24)
    }

    #[test]
    fn test_issue_then_validate_roundtrip() {
        let service = service();
        let user_id = Uuid::new_v4();

        let token = service.issue_token(user_id).expect("issue");
        let validated = service.validate_token(&token).expect("validate");

        assert_eq!(validated, user_id);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let err = service().validate_token("not.a.token").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let other = JwtService::new("another-secret-another-secret-xx".to_string(), 24);
        let token = other.issue_token(Uuid::new_v4()).expect("issue");

        assert!(matches!(
            service().validate_token(&token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = JwtService::new("0123456789abcdef0123456789abcdef".to_string(), -1);
        let token = service.issue_token(Uuid::new_v4()).expect("issue");

        assert!(matches!(
            service.validate_token(&token),
            Err(AppError::Unauthorized(_))
        ));
    }
}
