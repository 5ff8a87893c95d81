use secrecy::SecretString;
use std::env;

use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug)]
pub struct Config {
    pub backend_base_url: String,
    pub request_timeout_secs: u64,
    pub session_token: Option<SecretString>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            backend_base_url: env::var("PORTAL_BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            request_timeout_secs: env::var("PORTAL_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            session_token: env::var("PORTAL_SESSION_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty())
                .map(SecretString::from),
        }
    }

    /// Reject values the HTTP stack cannot work with. The session token is
    /// allowed to be absent here; its absence surfaces as an auth error at
    /// request time instead.
    pub fn validate(&self) -> AppResult<()> {
        if self.backend_base_url.trim().is_empty() {
            return Err(AppError::Validation(
                "PORTAL_BACKEND_URL must not be empty".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(AppError::Validation(
                "PORTAL_REQUEST_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            backend_base_url: "http://127.0.0.1:8080".to_string(),
            request_timeout_secs: 5,
            session_token: Some(SecretString::from("test_session_token".to_string())),
        }
    }
}
