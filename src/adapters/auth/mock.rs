//! Mock credential validator for testing.
//!
//! # Example
//!
//! ```ignore
//! use duplex_dispatch::adapters::auth::MockCredentialValidator;
//!
//! let validator = MockCredentialValidator::new()
//!     .with_user("alice", "wonderland")
//!     .with_user("bob", "builder");
//!
//! let result = validator.validate("alice", "wonderland").await?;
//! assert!(result.valid);
//! ```

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, Principal, Validation};
use crate::ports::CredentialValidator;

/// Mock validator holding a table of username → password.
///
/// Unknown users and wrong passwords are rejected.
#[derive(Debug, Default, Clone)]
pub struct MockCredentialValidator {
    users: HashMap<String, String>,
    /// Optional error to return for all validations (for error testing)
    force_error: Option<AuthError>,
}

impl MockCredentialValidator {
    /// Creates a new empty mock validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an accepted username/password pair.
    pub fn with_user(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.users.insert(username.into(), password.into());
        self
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(mut self, error: AuthError) -> Self {
        self.force_error = Some(error);
        self
    }

    /// Returns the number of registered users.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

#[async_trait]
impl CredentialValidator for MockCredentialValidator {
    async fn validate(&self, identity: &str, secret: &str) -> Result<Validation, AuthError> {
        if let Some(error) = &self.force_error {
            return Err(error.clone());
        }

        match self.users.get(identity) {
            Some(password) if password == secret => {
                Ok(Validation::accepted(Principal::new(identity)))
            }
            _ => Ok(Validation::rejected()),
        }
    }
}
