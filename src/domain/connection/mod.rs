//! Upgraded connections as seen by the dispatcher.
//!
//! - [`Connection`] - handle to one upgraded transport session
//! - [`ConnectionState`] - connecting → open → closing → closed
//! - [`ConnectionContext`] - per-connection scratch space owned by the hooks
//! - [`PeerSet`] - read-only snapshot of open connections on a route

mod context;
mod handle;
mod peers;
mod state;

pub use context::{ConnectionContext, TimerHandle};
pub use handle::{Connection, OutboundFrame};
pub use peers::PeerSet;
pub use state::{ConnectionState, StateCell};
