//! Authentication types for the domain layer.
//!
//! These types describe the caller identity established by a
//! `CredentialValidator`. They have no transport dependencies: the HTTP
//! adapter extracts `Credentials` from a header, the validator decides, and
//! the resulting `Principal` flows into the invocation context.

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// The identity a successful credential validation exposes to handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Username the caller authenticated as.
    pub username: String,
}

impl Principal {
    /// Creates a principal for the given username.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

/// Identity/secret pair presented by a caller.
///
/// The secret is wrapped so it never shows up in `Debug` output or logs.
#[derive(Debug, Clone)]
pub struct Credentials {
    identity: String,
    secret: SecretString,
}

impl Credentials {
    /// Creates a credential pair.
    pub fn new(identity: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            secret: SecretString::new(secret.into()),
        }
    }

    /// The claimed identity (username).
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// The presented secret (password).
    pub fn secret(&self) -> &str {
        self.secret.expose_secret()
    }
}

/// Outcome of a credential validation.
#[derive(Debug, Clone)]
pub struct Validation {
    /// Whether the credentials were accepted.
    pub valid: bool,
    /// The principal exposed on success.
    pub principal: Option<Principal>,
}

impl Validation {
    /// Accepted credentials for `principal`.
    pub fn accepted(principal: Principal) -> Self {
        Self {
            valid: true,
            principal: Some(principal),
        }
    }

    /// Rejected credentials.
    pub fn rejected() -> Self {
        Self {
            valid: false,
            principal: None,
        }
    }
}

/// Authentication errors raised before a handler is invoked.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The route requires credentials and none were presented.
    #[error("Missing authentication")]
    MissingCredentials,

    /// An `Authorization` header was present but could not be decoded.
    #[error("Malformed credentials")]
    MalformedCredentials,

    /// The validator rejected the identity/secret pair.
    #[error("Bad username or password")]
    InvalidCredentials,

    /// The credential validator could not be reached.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if the caller should retry with (different) credentials.
    pub fn requires_reauthentication(&self) -> bool {
        !self.is_transient()
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}
