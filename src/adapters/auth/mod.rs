//! Authentication adapters.
//!
//! Implementations of the `CredentialValidator` port:
//!
//! - `static_credentials` - one configured username/password (Basic auth)
//! - `mock` - table-driven test implementation

mod mock;
mod static_credentials;

pub use mock::MockCredentialValidator;
pub use static_credentials::StaticCredentialValidator;
