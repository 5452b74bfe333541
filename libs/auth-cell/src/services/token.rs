use chrono::{DateTime, Duration, FixedOffset, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use thiserror::Error;
use tracing::debug;

use shared_models::auth::{JwtClaims, TOKEN_ISSUER};

use crate::models::User;

const TOKEN_LIFETIME_HOURS: i64 = 2;
/// Expiry is computed in Brasília time (UTC-03:00).
const EXPIRY_OFFSET: FixedOffset = match FixedOffset::west_opt(3 * 3600) {
    Some(offset) => offset,
    None => panic!("UTC-03:00 is a valid offset"),
};

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token secret is not configured")]
    MissingSecret,

    #[error("Failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

#[derive(Clone)]
pub struct TokenService {
    secret: String,
}

impl TokenService {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    pub fn issue_token(&self, user: &User) -> Result<String, TokenError> {
        self.issue_token_at(user, Utc::now())
    }

    pub fn issue_token_at(&self, user: &User, now: DateTime<Utc>) -> Result<String, TokenError> {
        if self.secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let expires_at = now.with_timezone(&EXPIRY_OFFSET) + Duration::hours(TOKEN_LIFETIME_HOURS);

        let claims = JwtClaims {
            iss: TOKEN_ISSUER.to_string(),
            sub: user.login.clone(),
            exp: expires_at.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(TokenError::Signing)?;

        debug!("Issued token for {} expiring at {}", user.login, expires_at);
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::TimeZone;
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

    fn user(login: &str) -> User {
        User {
            id: Some(1),
            login: login.to_string(),
            password_hash: String::new(),
            role: "USER".to_string(),
        }
    }

    fn claims(token: &str, secret: &str) -> JwtClaims {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        decode::<JwtClaims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
            .unwrap()
            .claims
    }

    #[test]
    fn test_claims_for_login() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 14, 0, 0).unwrap();
        let service = TokenService::new("secret");

        let token = service.issue_token_at(&user("dr.silva"), now).unwrap();
        let claims = claims(&token, "secret");

        assert_eq!(claims.sub, "dr.silva");
        assert_eq!(claims.iss, "API Voll.med");
        assert_eq!(claims.exp, now.timestamp() + 2 * 3600);
    }

    #[test]
    fn test_expiry_offset_is_brasilia_time() {
        assert_eq!(EXPIRY_OFFSET.utc_minus_local(), 3 * 3600);
    }

    #[test]
    fn test_issued_token_passes_validation() {
        let service = TokenService::new("secret");
        let token = service.issue_token(&user("dr.silva")).unwrap();

        let validated = shared_utils::jwt::validate_token(&token, "secret").unwrap();

        assert_eq!(validated.login, "dr.silva");
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        let service = TokenService::new("");

        assert_matches!(service.issue_token(&user("dr.silva")), Err(TokenError::MissingSecret));
    }
}
