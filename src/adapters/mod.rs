//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the dispatcher core to external systems:
//! - `http` - axum endpoint, routing and server bootstrap
//! - `websocket` - session loop, in-memory connection registry, autoping
//! - `auth` - credential validators (static Basic, mock)

pub mod auth;
pub mod http;
pub mod websocket;

pub use auth::{MockCredentialValidator, StaticCredentialValidator};
pub use websocket::InMemoryConnectionRegistry;
