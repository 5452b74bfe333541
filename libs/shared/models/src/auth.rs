use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Issuer stamped on, and required from, every token this API handles.
pub const TOKEN_ISSUER: &str = "API Voll.med";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub iss: String,
    pub sub: String,
    pub exp: i64,
}

/// Principal placed in request extensions by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub login: String,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}
