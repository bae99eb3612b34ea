//! GreetingHandler - announces itself on upgrade and hangs up.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::command::ServerMessage;
use crate::domain::foundation::DispatchError;
use crate::ports::{InvocationContext, Reply, RouteHandler};

/// On the initial event sends `{"cmd":"HANDLING INIT"}` and closes the
/// connection. Any later payload is echoed as `{"at": <route>, "seen": ..}`.
#[derive(Debug, Clone)]
pub struct GreetingHandler {
    at: String,
}

impl GreetingHandler {
    pub fn new(at: impl Into<String>) -> Self {
        Self { at: at.into() }
    }
}

#[async_trait]
impl RouteHandler for GreetingHandler {
    async fn handle(
        &self,
        payload: Option<Value>,
        ctx: &InvocationContext,
    ) -> Result<Reply, DispatchError> {
        if ctx.is_initial() {
            if let Some(conn) = ctx.connection() {
                conn.send_json(&ServerMessage::HandlingInit);
                conn.close();
            }
            return Ok(Reply::Empty);
        }

        Ok(Reply::Json(
            json!({ "at": self.at, "seen": payload.unwrap_or(Value::Null) }),
        ))
    }
}
