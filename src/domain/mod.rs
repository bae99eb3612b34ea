//! Domain layer: transport-independent types for the dispatcher.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, errors, auth, state machine)
//! - `protocol` - Route modes and upgrade negotiation
//! - `framing` - Envelope codec for framed connections
//! - `connection` - Connection handle, per-connection context, peer snapshots
//! - `command` - Closed command set for command-dispatch routes

pub mod command;
pub mod connection;
pub mod foundation;
pub mod framing;
pub mod protocol;
