//! Unified handler invoker.
//!
//! One [`RouteHandler`] contract serves both transports. For unary calls the
//! result is handed back to the HTTP adapter. For connection-bound calls the
//! invoker unwraps the inbound frame, runs the handler and sends the reply
//! (or an error frame) on the same connection.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::connection::Connection;
use crate::domain::foundation::{DispatchError, Principal};
use crate::domain::framing::FramingCodec;
use crate::ports::{ConnectionRegistry, InvocationContext, Reply};

use super::route::Route;

/// Runs route handlers with a fresh [`InvocationContext`] per event.
#[derive(Clone)]
pub struct HandlerInvoker {
    registry: Arc<dyn ConnectionRegistry>,
}

impl HandlerInvoker {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Invokes the handler for a plain request/response call.
    pub async fn unary(
        &self,
        route: &Route,
        principal: Option<Principal>,
        payload: Option<Value>,
    ) -> Result<Reply, DispatchError> {
        let ctx = InvocationContext::unary(route.key().clone(), principal, self.registry.clone());
        route.handler().handle(payload, &ctx).await
    }

    /// Binds the invoker to one established connection.
    pub fn bind(
        &self,
        route: Arc<Route>,
        connection: Arc<Connection>,
        principal: Option<Principal>,
    ) -> BoundInvoker {
        let codec = route.codec();
        BoundInvoker {
            route,
            connection,
            principal,
            codec,
            registry: self.registry.clone(),
        }
    }
}

/// Handler invoker for a single connection.
///
/// Nothing here closes the connection: payload, codec and handler errors are
/// reported as error frames and the session carries on.
pub struct BoundInvoker {
    route: Arc<Route>,
    connection: Arc<Connection>,
    principal: Option<Principal>,
    codec: Option<FramingCodec>,
    registry: Arc<dyn ConnectionRegistry>,
}

impl BoundInvoker {
    pub fn connection(&self) -> &Arc<Connection> {
        &self.connection
    }

    /// Delivers the synthetic `is_initial` event with no payload.
    pub async fn initial(&self) {
        let result = self.invoke(None, true).await;
        self.deliver(result);
    }

    /// Decodes one inbound frame and delivers it to the handler.
    pub async fn message(&self, frame: &[u8]) {
        let result = match self.decode(frame) {
            Ok(payload) => self.invoke(Some(payload), false).await,
            Err(e) => Err(e),
        };
        self.deliver(result);
    }

    fn decode(&self, frame: &[u8]) -> Result<Value, DispatchError> {
        match &self.codec {
            Some(codec) => Ok(codec.decode(frame)?),
            None => serde_json::from_slice(frame)
                .map_err(|_| DispatchError::payload("invalid JSON payload")),
        }
    }

    async fn invoke(&self, payload: Option<Value>, is_initial: bool) -> Result<Reply, DispatchError> {
        let ctx = InvocationContext::for_connection(
            self.connection.clone(),
            self.principal.clone(),
            is_initial,
            self.registry.clone(),
        );
        self.route.handler().handle(payload, &ctx).await
    }

    fn deliver(&self, result: Result<Reply, DispatchError>) {
        let frame = match result {
            Ok(Reply::Empty) => return,
            Ok(Reply::Json(value)) => self.encode_reply(&value),
            Err(err) => {
                tracing::debug!(
                    connection_id = %self.connection.id(),
                    path = %self.route.path(),
                    error = %err,
                    "handler error sent to connection"
                );
                self.encode_error(&err)
            }
        };

        match frame {
            Ok(text) => {
                if !self.connection.send_text(text) {
                    tracing::debug!(
                        connection_id = %self.connection.id(),
                        "reply dropped, connection not writable"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(connection_id = %self.connection.id(), error = %e, "failed to encode reply");
            }
        }
    }

    fn encode_reply(&self, value: &Value) -> Result<String, DispatchError> {
        match &self.codec {
            Some(codec) => Ok(codec.encode(value)?),
            None => serde_json::to_string(value).map_err(|e| DispatchError::internal(e.to_string())),
        }
    }

    fn encode_error(&self, err: &DispatchError) -> Result<String, DispatchError> {
        let body = err.to_body();
        match &self.codec {
            Some(codec) => Ok(codec.encode_error(&body)?),
            None => serde_json::to_string(&body).map_err(|e| DispatchError::internal(e.to_string())),
        }
    }
}
