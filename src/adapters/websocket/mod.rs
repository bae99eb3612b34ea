//! WebSocket adapters for upgraded connections.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    HTTP dispatch endpoint                     │
//! │   negotiation accepted → WebSocketUpgrade::on_upgrade         │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        run_session                            │
//! │   reader loop → BoundInvoker → Connection → writer task       │
//! │   lifecycle hooks + autoping timer in the connection context  │
//! └──────────────────────────────────────────────────────────────┘
//!                               │ join / leave
//!                               ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                InMemoryConnectionRegistry                     │
//! │   POST /quux: conn-a, conn-b     POST /bar: conn-c            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`registry`] - In-memory connection registry grouped by route
//! - [`session`] - Per-connection reader/writer loop
//! - [`autoping`] - Transport Ping frames on a fixed interval

pub mod autoping;
pub mod registry;
pub mod session;

pub use autoping::{spawn_autoping, AUTOPING_TIMER};
pub use registry::InMemoryConnectionRegistry;
pub use session::{run_session, SessionSetup};
