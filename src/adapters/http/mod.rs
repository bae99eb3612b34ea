//! HTTP adapters - the axum surface of the dispatcher.
//!
//! - `router` - mounts every route path for `POST` and `GET`
//! - `dispatch` - the shared endpoint: auth, payload, negotiation, invoke/upgrade
//! - `error` - `DispatchError` → JSON error response
//! - `credentials` - Basic `Authorization` header decoding
//! - `upgrade` - WebSocket upgrade detection
//! - `server` - dispatcher assembly and serve loop

pub mod credentials;
pub mod dispatch;
pub mod error;
pub mod router;
pub mod server;
pub mod upgrade;

pub use dispatch::{dispatch, DispatchState};
pub use error::ApiError;
pub use router::dispatch_router;
pub use server::{app, build_dispatcher, serve, shutdown_signal, StartupError};
