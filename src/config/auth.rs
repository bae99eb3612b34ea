//! Basic authentication configuration

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;

/// Credentials accepted by the static Basic validator
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Accepted username
    #[serde(default = "default_username")]
    pub username: String,

    /// Accepted password
    #[serde(default = "default_password")]
    pub password: SecretString,
}

impl AuthConfig {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::new(password.into()),
        }
    }

    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__USERNAME"));
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
        }
    }
}

fn default_username() -> String {
    "foo".to_string()
}

fn default_password() -> SecretString {
    SecretString::new("bar".to_string())
}
