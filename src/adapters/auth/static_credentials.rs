//! Credential validator backed by a single configured username/password.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

use crate::config::AuthConfig;
use crate::domain::foundation::{AuthError, Principal, Validation};
use crate::ports::CredentialValidator;

/// Accepts exactly one identity/secret pair.
///
/// Both halves are compared in constant time so response timing does not
/// reveal how much of a guess was right.
#[derive(Debug, Clone)]
pub struct StaticCredentialValidator {
    username: String,
    password: SecretString,
}

impl StaticCredentialValidator {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.username.clone(), config.password.clone())
    }
}

#[async_trait]
impl CredentialValidator for StaticCredentialValidator {
    async fn validate(&self, identity: &str, secret: &str) -> Result<Validation, AuthError> {
        let user_ok = identity.as_bytes().ct_eq(self.username.as_bytes());
        let pass_ok = secret
            .as_bytes()
            .ct_eq(self.password.expose_secret().as_bytes());

        if bool::from(user_ok & pass_ok) {
            Ok(Validation::accepted(Principal::new(identity)))
        } else {
            Ok(Validation::rejected())
        }
    }
}
