//! Per-route protocol options and upgrade negotiation.
//!
//! A route declares whether it is unary, optionally upgradeable or
//! upgrade-only. The negotiator classifies each inbound request against that
//! declaration before any handler runs.

mod mode;
mod negotiation;

pub use mode::{ProtocolOptions, RouteMode, TransportMode};
pub use negotiation::{negotiate, InboundRequest, Negotiated, UpgradePlan};
