//! EchoHandler - reports which route saw which payload.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::foundation::DispatchError;
use crate::ports::{InvocationContext, Reply, RouteHandler};

/// Replies `{"at": <route>, "seen": <payload>}`.
///
/// With [`EchoHandler::with_mode`] the reply also names the transport the
/// call arrived on: `{"at": .., "mode": "http" | "websocket", "seen": ..}`.
#[derive(Debug, Clone)]
pub struct EchoHandler {
    at: String,
    report_mode: bool,
}

impl EchoHandler {
    pub fn new(at: impl Into<String>) -> Self {
        Self {
            at: at.into(),
            report_mode: false,
        }
    }

    pub fn with_mode(mut self) -> Self {
        self.report_mode = true;
        self
    }
}

#[async_trait]
impl RouteHandler for EchoHandler {
    async fn handle(
        &self,
        payload: Option<Value>,
        ctx: &InvocationContext,
    ) -> Result<Reply, DispatchError> {
        let seen = payload.unwrap_or(Value::Null);
        let body = if self.report_mode {
            json!({ "at": self.at, "mode": ctx.transport().as_str(), "seen": seen })
        } else {
            json!({ "at": self.at, "seen": seen })
        };
        Ok(Reply::Json(body))
    }
}
