//! Duplex Dispatch - one route table serving HTTP and WebSocket traffic.
//!
//! Every route is a single handler. Plain `POST` requests get one response;
//! upgraded connections feed each inbound frame through the same handler,
//! with optional envelope framing, lifecycle hooks, keepalive timers and
//! peer broadcast.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
