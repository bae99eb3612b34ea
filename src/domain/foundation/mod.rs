//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, authentication types, the state machine
//! trait and the error taxonomy shared by every layer of the dispatcher.

mod auth;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, Credentials, Principal, Validation};
pub use errors::{DispatchError, ErrorBody, ErrorCode, ValidationError};
pub use ids::{ConnectionId, RouteKey};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
