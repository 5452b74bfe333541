use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, Response},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;

use shared_config::AppConfig;
use shared_models::auth::{JwtClaims, TOKEN_ISSUER};

pub struct TestConfig {
    pub token_secret: String,
    pub supabase_url: String,
    pub supabase_service_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            token_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            token_secret: self.token_secret.clone(),
            server_port: 3000,
            admin_login: None,
            admin_password: None,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }

    /// Bearer token accepted by `auth_middleware` under this config.
    pub fn bearer_token(&self, login: &str) -> String {
        JwtTestUtils::create_test_token(login, &self.token_secret, Some(2))
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    fn sign(claims: &JwtClaims, secret: &str) -> String {
        encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes()))
            .expect("test token must encode")
    }

    pub fn create_test_token(login: &str, secret: &str, exp_hours: Option<i64>) -> String {
        let exp = Utc::now() + Duration::hours(exp_hours.unwrap_or(2));

        Self::sign(
            &JwtClaims {
                iss: TOKEN_ISSUER.to_string(),
                sub: login.to_string(),
                exp: exp.timestamp(),
            },
            secret,
        )
    }

    pub fn create_expired_token(login: &str, secret: &str) -> String {
        Self::create_test_token(login, secret, Some(-1))
    }

    pub fn create_foreign_issuer_token(login: &str, secret: &str) -> String {
        Self::sign(
            &JwtClaims {
                iss: "someone else".to_string(),
                sub: login.to_string(),
                exp: (Utc::now() + Duration::hours(2)).timestamp(),
            },
            secret,
        )
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// Builds a request with an optional bearer token and JSON body.
pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, "localhost:3000");

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    builder.body(body).expect("test request must build")
}

/// Reads a response body as JSON, `Value::Null` when empty.
pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body must be readable");

    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body must be JSON")
    }
}
