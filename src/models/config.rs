//! Configuration model loaded from external sources.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting `{0}`")]
    Missing(&'static str),

    #[error("invalid setting `{0}`: {1}")]
    Invalid(&'static str, String),
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    /// Key for the session, identity and flash cookies; at least 64 bytes.
    pub secret: String,
    /// Base URL of the hosted backend, e.g. `https://project.example.co`.
    #[serde(default)]
    pub backend_url: String,
    /// Public key for user-scoped calls.
    #[serde(default)]
    pub backend_anon_key: String,
    /// Privileged key used only by the admin client.
    #[serde(default)]
    pub backend_service_role_key: String,
}

impl ServerConfig {
    const MIN_SECRET_LEN: usize = 64;

    /// Fails on missing backend credentials or an unusable cookie secret.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("backend_url", &self.backend_url),
            ("backend_anon_key", &self.backend_anon_key),
            ("backend_service_role_key", &self.backend_service_role_key),
            ("secret", &self.secret),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing(name));
            }
        }

        let url = self.backend_url.trim();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::Invalid(
                "backend_url",
                "expected an http(s) URL".to_string(),
            ));
        }

        if self.secret.len() < Self::MIN_SECRET_LEN {
            return Err(ConfigError::Invalid(
                "secret",
                format!("must be at least {} bytes", Self::MIN_SECRET_LEN),
            ));
        }

        Ok(())
    }
}
