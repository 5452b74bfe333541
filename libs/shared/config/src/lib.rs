use std::env;
use tracing::warn;

const DEFAULT_SERVER_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub token_secret: String,
    pub server_port: u16,
    /// Account created at startup when absent, for the first login.
    pub admin_login: Option<String>,
    pub admin_password: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_service_key: env::var("SUPABASE_SERVICE_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_SERVICE_KEY not set, using empty value");
                    String::new()
                }),
            token_secret: env::var("API_SECURITY_TOKEN_SECRET")
                .unwrap_or_else(|_| {
                    warn!("API_SECURITY_TOKEN_SECRET not set, using empty value");
                    String::new()
                }),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|port| match port.parse() {
                    Ok(port) => Some(port),
                    Err(_) => {
                        warn!("SERVER_PORT '{}' is not a valid port, using default", port);
                        None
                    }
                })
                .unwrap_or(DEFAULT_SERVER_PORT),
            admin_login: env::var("API_ADMIN_LOGIN").ok().filter(|v| !v.is_empty()),
            admin_password: env::var("API_ADMIN_PASSWORD").ok().filter(|v| !v.is_empty()),
        };

        if config.token_secret.is_empty() {
            warn!("Token secret missing - login will fail until API_SECURITY_TOKEN_SECRET is set");
        }

        config
    }

    /// True when a Supabase project is configured as the backing store.
    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_service_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str, key: &str) -> AppConfig {
        AppConfig {
            supabase_url: url.to_string(),
            supabase_service_key: key.to_string(),
            token_secret: "secret".to_string(),
            server_port: DEFAULT_SERVER_PORT,
            admin_login: None,
            admin_password: None,
        }
    }

    #[test]
    fn test_is_configured_requires_url_and_key() {
        assert!(config("http://localhost:54321", "service-key").is_configured());
        assert!(!config("", "service-key").is_configured());
        assert!(!config("http://localhost:54321", "").is_configured());
    }
}
