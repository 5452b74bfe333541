use serde::{Deserialize, Serialize};
use validator::Validate;

use shared_database::Entity;

pub const DEFAULT_ROLE: &str = "USER";

/// Account allowed to obtain tokens. Never serialized into a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub login: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub role: String,
}

impl Entity for User {
    const TABLE: &'static str = "users";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn sort_column(property: &str) -> Option<&'static str> {
        match property {
            "id" => Some("id"),
            "login" => Some("login"),
            _ => None,
        }
    }
}

#[derive(Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom(function = "shared_models::validation::not_blank"))]
    pub login: String,

    #[serde(rename = "senha")]
    #[validate(custom(function = "shared_models::validation::not_blank"))]
    pub password: String,
}
