//! Closed command set for command-dispatch routes.
//!
//! Inbound payloads look like `{ "cmd": <string>, ...fields }`. Parsing maps
//! the free-form `cmd` onto [`Command`] so every handler branch is an
//! exhaustive match.

use serde::Serialize;
use serde_json::{json, Value};

use super::foundation::DispatchError;

/// Commands a client may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Liveness check, answered with `{"result":"PONG"}`.
    Ping,
    /// Wake every other connection on the route.
    AwakeAll,
}

impl Command {
    pub const PING: &'static str = "PING";
    pub const AWAKE_ALL: &'static str = "AWAKE-ALL";

    /// Parses the `cmd` field of a payload.
    ///
    /// # Errors
    ///
    /// - `Payload("invalid request")` if the payload is absent, not an
    ///   object, or has no string `cmd`
    /// - `Payload("unknown command")` for an unrecognized `cmd`
    pub fn parse(payload: Option<&Value>) -> Result<Self, DispatchError> {
        let cmd = payload
            .and_then(Value::as_object)
            .and_then(|body| body.get("cmd"))
            .and_then(Value::as_str)
            .ok_or_else(|| DispatchError::payload("invalid request"))?;

        match cmd {
            Self::PING => Ok(Command::Ping),
            Self::AWAKE_ALL => Ok(Command::AwakeAll),
            _ => Err(DispatchError::payload("unknown command")),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Ping => Self::PING,
            Command::AwakeAll => Self::AWAKE_ALL,
        }
    }
}

/// Messages the server pushes over a connection outside of a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "cmd")]
pub enum ServerMessage {
    #[serde(rename = "PING")]
    Ping,
    #[serde(rename = "AWAKE")]
    Awake,
    #[serde(rename = "HELLO")]
    Hello { arg: String },
    #[serde(rename = "HANDLING INIT")]
    HandlingInit,
}

/// Reply body for [`Command::Ping`].
pub fn pong() -> Value {
    json!({ "result": "PONG" })
}
