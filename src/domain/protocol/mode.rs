//! Route modes and the protocol options a route declares.

use std::fmt;
use std::time::Duration;

use crate::domain::foundation::ValidationError;
use crate::domain::framing::FramingConfig;

/// How a route treats protocol upgrades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteMode {
    /// Plain request/response only; upgrades are refused.
    #[default]
    Unary,
    /// Serves plain requests and upgraded connections alike.
    OptionalUpgrade,
    /// Serves upgraded connections only; plain requests are refused.
    UpgradeOnly,
}

impl RouteMode {
    /// True if an upgrade may be accepted.
    pub fn allows_upgrade(&self) -> bool {
        !matches!(self, RouteMode::Unary)
    }

    /// True if a plain request must be refused.
    pub fn requires_upgrade(&self) -> bool {
        matches!(self, RouteMode::UpgradeOnly)
    }
}

impl fmt::Display for RouteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RouteMode::Unary => "unary",
            RouteMode::OptionalUpgrade => "optional-upgrade",
            RouteMode::UpgradeOnly => "upgrade-only",
        };
        write!(f, "{}", s)
    }
}

/// The transport an invocation arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Http,
    WebSocket,
}

impl TransportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Http => "http",
            TransportMode::WebSocket => "websocket",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protocol options a route declares at registration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProtocolOptions {
    pub mode: RouteMode,
    /// Deliver a synthetic `is_initial` invocation right after upgrade.
    pub initially: bool,
    /// Transport-level ping interval while the connection is open.
    pub autoping: Option<Duration>,
    /// Subprotocol the client must offer.
    pub subprotocol: Option<String>,
    /// Envelope framing for connection-bound payloads.
    pub framing: Option<FramingConfig>,
}

impl ProtocolOptions {
    /// Options for a plain request/response route.
    pub fn unary() -> Self {
        Self::default()
    }

    /// Checks the options are consistent with the mode.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.mode.allows_upgrade() {
            let connection_only = [
                ("initially", self.initially),
                ("autoping", self.autoping.is_some()),
                ("subprotocol", self.subprotocol.is_some()),
                ("framing", self.framing.is_some()),
            ];
            if let Some((field, _)) = connection_only.iter().find(|(_, set)| *set) {
                return Err(ValidationError::invalid_format(
                    *field,
                    "only valid on routes that accept upgrades",
                ));
            }
        }

        if self.subprotocol.is_some() && !self.mode.requires_upgrade() {
            return Err(ValidationError::invalid_format(
                "subprotocol",
                "only valid on upgrade-only routes",
            ));
        }

        if let Some(subprotocol) = &self.subprotocol {
            if subprotocol.trim().is_empty() {
                return Err(ValidationError::empty_field("subprotocol"));
            }
            if subprotocol.contains(',') || subprotocol.contains(char::is_whitespace) {
                return Err(ValidationError::invalid_format(
                    "subprotocol",
                    "must be a single token",
                ));
            }
        }

        if self.autoping == Some(Duration::ZERO) {
            return Err(ValidationError::invalid_format(
                "autoping",
                "interval must be greater than zero",
            ));
        }

        if let Some(framing) = &self.framing {
            framing.validate()?;
        }

        Ok(())
    }
}
