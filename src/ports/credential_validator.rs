//! Credential validation port.
//!
//! The dispatcher hands the identity/secret pair extracted from the request to
//! this port and treats `valid == false` as an authentication failure. How
//! credentials are checked (static table, directory lookup, remote service)
//! is the adapter's business.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, Validation};

/// Validates an identity/secret pair.
///
/// # Contract
///
/// Implementations must:
/// - Return `Ok(Validation { valid: true, principal: Some(_) })` on success
/// - Return `Ok(Validation { valid: false, .. })` for unknown identities or
///   wrong secrets
/// - Return `Err(AuthError::ServiceUnavailable)` only for transient failures
#[async_trait]
pub trait CredentialValidator: Send + Sync {
    async fn validate(&self, identity: &str, secret: &str) -> Result<Validation, AuthError>;
}
