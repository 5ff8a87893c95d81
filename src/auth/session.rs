use secrecy::SecretString;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

/// Supplies the ambient credential attached to every backend call. The
/// surrounding shell owns how the credential is obtained; the engine only
/// requires that one exists before any request leaves the process.
pub trait SessionProvider: Send + Sync {
    fn access_token(&self) -> AppResult<SecretString>;
}

/// Credential sourced from configuration (ultimately the environment).
pub struct EnvSessionProvider {
    token: Option<SecretString>,
}

impl EnvSessionProvider {
    pub fn from_config(config: &Config) -> Self {
        Self {
            token: config.session_token.clone(),
        }
    }
}

impl SessionProvider for EnvSessionProvider {
    fn access_token(&self) -> AppResult<SecretString> {
        self.token
            .clone()
            .ok_or_else(|| AppError::Auth("no session token configured".to_string()))
    }
}

/// Fixed credential, used by tests and by shells that manage the token
/// lifecycle themselves.
pub struct StaticSessionProvider {
    token: SecretString,
}

impl StaticSessionProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }
}

impl SessionProvider for StaticSessionProvider {
    fn access_token(&self) -> AppResult<SecretString> {
        Ok(self.token.clone())
    }
}
