use axum::{extract::State, Json};
use tracing::{debug, error, info};

use shared_models::auth::TokenResponse;
use shared_models::error::AppError;
use shared_utils::validation::ValidatedJson;

use crate::models::LoginRequest;
use crate::router::AuthState;
use crate::services::password::PasswordService;

fn bad_credentials() -> AppError {
    AppError::Auth("Invalid login or password".to_string())
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AuthState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let Some(user) = state.users.find_one_by("login", &request.login).await? else {
        debug!("Login attempt for unknown user {}", request.login);
        return Err(bad_credentials());
    };

    let matches = PasswordService::verify_password(&request.password, &user.password_hash).map_err(|e| {
        error!("Stored password hash for {} is unreadable: {}", user.login, e);
        AppError::Internal("Failed to verify credentials".to_string())
    })?;

    if !matches {
        debug!("Wrong password for {}", user.login);
        return Err(bad_credentials());
    }

    let token = state.tokens.issue_token(&user).map_err(|e| {
        error!("Token issuance failed: {:?}", e);
        AppError::Internal(e.to_string())
    })?;

    info!("User {} logged in", user.login);
    Ok(Json(TokenResponse { token }))
}
