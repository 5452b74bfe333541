use chrono::{TimeZone, Utc};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use tracing::debug;

use shared_models::auth::{AuthenticatedUser, JwtClaims, TOKEN_ISSUER};

pub fn validate_token(token: &str, secret: &str) -> Result<AuthenticatedUser, String> {
    if secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[TOKEN_ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    validation.leeway = 0;

    let data = decode::<JwtClaims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map_err(|e| {
            debug!("Token rejected: {}", e);
            match e.kind() {
                ErrorKind::ExpiredSignature => "Token expired".to_string(),
                ErrorKind::InvalidIssuer => "Invalid token issuer".to_string(),
                ErrorKind::InvalidSignature => "Invalid token signature".to_string(),
                _ => "Invalid token".to_string(),
            }
        })?;

    let claims = data.claims;
    let user = AuthenticatedUser {
        expires_at: Utc.timestamp_opt(claims.exp, 0).single(),
        login: claims.sub,
    };

    debug!("Token validated successfully for user: {}", user.login);
    Ok(user)
}
