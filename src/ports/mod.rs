//! Ports - Interfaces between the dispatcher core and the outside world.
//!
//! Following hexagonal architecture, ports define the contracts; adapters
//! implement them.
//!
//! - `CredentialValidator` - checks identity/secret pairs
//! - `ConnectionRegistry` - tracks open connections per route for broadcast
//! - `RouteHandler` - user logic shared by unary and connection-bound calls
//! - `LifecycleHooks` - connect/disconnect callbacks for upgraded routes

mod connection_registry;
mod credential_validator;
mod lifecycle_hooks;
mod route_handler;

pub use connection_registry::ConnectionRegistry;
pub use credential_validator::CredentialValidator;
pub use lifecycle_hooks::LifecycleHooks;
pub use route_handler::{InvocationContext, Reply, RouteHandler};
