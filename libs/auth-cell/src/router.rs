use std::sync::Arc;

use axum::{routing::post, Router};

use shared_database::Repository;

use crate::handlers;
use crate::models::User;
use crate::services::token::TokenService;

#[derive(Clone)]
pub struct AuthState {
    pub users: Arc<dyn Repository<User>>,
    pub tokens: TokenService,
}

/// `/login` is the only route reachable without a token.
pub fn auth_routes(state: AuthState) -> Router {
    Router::new()
        .route("/login", post(handlers::login))
        .with_state(state)
}
