//! CommandHandler - `{ "cmd": .. }` dispatch with peer broadcast.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::command::{pong, Command, ServerMessage};
use crate::domain::foundation::DispatchError;
use crate::ports::{InvocationContext, Reply, RouteHandler};

/// Greets a new connection with `{"cmd":"HELLO","arg":<username>}` and then
/// serves the closed [`Command`] set:
///
/// - `PING` replies `{"result":"PONG"}`
/// - `AWAKE-ALL` sends `{"cmd":"AWAKE"}` to every other open connection on
///   the route and replies with nothing
#[derive(Debug, Clone, Default)]
pub struct CommandHandler;

impl CommandHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RouteHandler for CommandHandler {
    async fn handle(
        &self,
        payload: Option<Value>,
        ctx: &InvocationContext,
    ) -> Result<Reply, DispatchError> {
        if ctx.is_initial() {
            if let Some(conn) = ctx.connection() {
                let arg = ctx
                    .principal()
                    .map(|p| p.username.clone())
                    .unwrap_or_default();
                conn.send_json(&ServerMessage::Hello { arg });
            }
            return Ok(Reply::Empty);
        }

        match Command::parse(payload.as_ref())? {
            Command::Ping => Ok(Reply::Json(pong())),
            Command::AwakeAll => {
                let peers = ctx.peers().await;
                let reached = peers.broadcast_json(&ServerMessage::Awake);
                tracing::debug!(route = %ctx.route(), peers = peers.len(), reached, "broadcast AWAKE");
                Ok(Reply::Empty)
            }
        }
    }
}
