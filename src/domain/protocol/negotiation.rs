//! Classification of inbound requests against a route's protocol options.
//!
//! Pure function: no transport is touched here. The adapter performs the
//! actual upgrade when the outcome is [`Negotiated::Upgrade`].

use std::time::Duration;

use crate::domain::foundation::DispatchError;
use crate::domain::framing::FramingConfig;

use super::{ProtocolOptions, RouteMode};

/// What the negotiator needs to know about an inbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundRequest {
    /// The client asked for a protocol upgrade.
    pub upgrade: bool,
    /// Subprotocols offered by the client, in preference order.
    pub offered_protocols: Vec<String>,
}

impl InboundRequest {
    /// A plain request/response call.
    pub fn plain() -> Self {
        Self::default()
    }

    /// An upgrade request offering the given subprotocols.
    pub fn upgrade<I, S>(offered: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            upgrade: true,
            offered_protocols: offered.into_iter().map(Into::into).collect(),
        }
    }
}

/// Everything the transport needs to run an accepted upgrade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradePlan {
    /// Subprotocol to echo in the handshake.
    pub subprotocol: Option<String>,
    pub initially: bool,
    pub autoping: Option<Duration>,
    pub framing: Option<FramingConfig>,
}

/// Negotiation outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Negotiated {
    /// Serve as a single request/response.
    Unary,
    /// Upgrade the transport and run a connection session.
    Upgrade(UpgradePlan),
}

/// Decides how to serve `request` on a route declaring `options`.
///
/// # Errors
///
/// `DispatchError::Protocol` when:
/// - an upgrade is requested on a unary route
/// - a plain request reaches an upgrade-only route
/// - the route requires a subprotocol the client did not offer
pub fn negotiate(
    options: &ProtocolOptions,
    request: &InboundRequest,
) -> Result<Negotiated, DispatchError> {
    match (options.mode, request.upgrade) {
        (RouteMode::Unary, true) => Err(DispatchError::protocol(
            "upgrade not supported on this route",
        )),
        (RouteMode::UpgradeOnly, false) => Err(DispatchError::protocol(
            "upgrade required on this route",
        )),
        (_, false) => Ok(Negotiated::Unary),
        (_, true) => {
            let subprotocol = match &options.subprotocol {
                Some(required) => {
                    if !request.offered_protocols.iter().any(|p| p == required) {
                        return Err(DispatchError::protocol(format!(
                            "subprotocol '{}' required",
                            required
                        )));
                    }
                    Some(required.clone())
                }
                None => None,
            };

            Ok(Negotiated::Upgrade(UpgradePlan {
                subprotocol,
                initially: options.initially,
                autoping: options.autoping,
                framing: options.framing.clone(),
            }))
        }
    }
}
