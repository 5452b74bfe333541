use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use tracing::{info, instrument};

use shared_database::Repository;
use shared_models::error::AppError;

use crate::models::{User, DEFAULT_ROLE};

pub struct PasswordService;

impl PasswordService {
    #[instrument(skip(password))]
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    /// `Ok(false)` for a wrong password, `Err` only for an unreadable hash.
    #[instrument(skip(password, hash))]
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
        let parsed_hash = PasswordHash::new(hash)?;
        let argon2 = Argon2::default();

        match argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Stores `login` with a hash of `password` unless the login already exists.
/// Returns whether a user was created.
pub async fn ensure_user(users: &dyn Repository<User>, login: &str, password: &str) -> Result<bool, AppError> {
    if users.find_one_by("login", login).await?.is_some() {
        return Ok(false);
    }

    let password_hash = PasswordService::hash_password(password)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

    users
        .save(User {
            id: None,
            login: login.to_string(),
            password_hash,
            role: DEFAULT_ROLE.to_string(),
        })
        .await?;

    info!("Created user {}", login);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_database::InMemoryRepository;

    #[test]
    fn test_hash_then_verify() {
        let hash = PasswordService::hash_password("s3nh@-forte").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(PasswordService::verify_password("s3nh@-forte", &hash).unwrap());
        assert!(!PasswordService::verify_password("outra", &hash).unwrap());
    }

    #[test]
    fn test_garbage_hash_is_an_error() {
        assert!(PasswordService::verify_password("x", "not-a-phc-string").is_err());
    }

    #[tokio::test]
    async fn test_ensure_user_is_idempotent() {
        let users = InMemoryRepository::<User>::new();

        assert!(ensure_user(&users, "admin", "secret").await.unwrap());
        assert!(!ensure_user(&users, "admin", "other").await.unwrap());

        let stored = users.find_one_by("login", "admin").await.unwrap().unwrap();
        assert_eq!(users.len().await, 1);
        assert_eq!(stored.role, DEFAULT_ROLE);
        assert!(PasswordService::verify_password("secret", &stored.password_hash).unwrap());
    }
}
