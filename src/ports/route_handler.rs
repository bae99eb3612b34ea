//! Route handler port - the single contract shared by unary and
//! connection-bound invocations.
//!
//! A handler receives the logical payload (already unwrapped from any framing
//! envelope) and an [`InvocationContext`], and returns a [`Reply`] or a
//! [`DispatchError`]. The invoker decides what that means on the wire.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::connection::{Connection, PeerSet};
use crate::domain::foundation::{DispatchError, Principal, RouteKey};
use crate::domain::protocol::TransportMode;

use super::ConnectionRegistry;

/// Handler result.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Nothing to send back (HTTP 204, no frame on a connection).
    Empty,
    /// A JSON body (HTTP 200, or a frame on a connection).
    Json(Value),
}

impl Reply {
    pub fn is_empty(&self) -> bool {
        matches!(self, Reply::Empty)
    }
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        Reply::Json(value)
    }
}

/// Everything a handler may know about one inbound event.
///
/// Created fresh per event and dropped when the handler returns.
#[derive(Clone)]
pub struct InvocationContext {
    route: RouteKey,
    principal: Option<Principal>,
    is_initial: bool,
    connection: Option<Arc<Connection>>,
    registry: Arc<dyn ConnectionRegistry>,
}

impl InvocationContext {
    /// Context for a plain request/response call.
    pub fn unary(
        route: RouteKey,
        principal: Option<Principal>,
        registry: Arc<dyn ConnectionRegistry>,
    ) -> Self {
        Self {
            route,
            principal,
            is_initial: false,
            connection: None,
            registry,
        }
    }

    /// Context for an event arriving on an upgraded connection.
    pub fn for_connection(
        connection: Arc<Connection>,
        principal: Option<Principal>,
        is_initial: bool,
        registry: Arc<dyn ConnectionRegistry>,
    ) -> Self {
        Self {
            route: connection.route().clone(),
            principal,
            is_initial,
            connection: Some(connection),
            registry,
        }
    }

    pub fn route(&self) -> &RouteKey {
        &self.route
    }

    /// Authenticated caller, if the route required credentials.
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// True only for the synthetic first event after an upgrade.
    pub fn is_initial(&self) -> bool {
        self.is_initial
    }

    pub fn transport(&self) -> TransportMode {
        match self.connection {
            Some(_) => TransportMode::WebSocket,
            None => TransportMode::Http,
        }
    }

    /// The caller's own connection, if connection-bound.
    pub fn connection(&self) -> Option<&Arc<Connection>> {
        self.connection.as_ref()
    }

    /// Snapshot of the other open connections on this route.
    pub async fn peers(&self) -> PeerSet {
        let peers = self.registry.peers(&self.route).await;
        match &self.connection {
            Some(own) => peers.excluding(own.id()),
            None => peers,
        }
    }
}

impl std::fmt::Debug for InvocationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvocationContext")
            .field("route", &self.route)
            .field("principal", &self.principal)
            .field("is_initial", &self.is_initial)
            .field("connection", &self.connection.as_ref().map(|c| c.id()))
            .finish()
    }
}

/// User logic bound to a route.
///
/// The same implementation serves unary calls and connection-bound messages;
/// use [`InvocationContext::transport`] and [`InvocationContext::is_initial`]
/// to tell them apart.
#[async_trait]
pub trait RouteHandler: Send + Sync {
    async fn handle(
        &self,
        payload: Option<Value>,
        ctx: &InvocationContext,
    ) -> Result<Reply, DispatchError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::websocket::InMemoryConnectionRegistry;
    use crate::domain::connection::OutboundFrame;
    use serde_json::json;
    use tokio::sync::mpsc;

    fn open_conn(path: &str) -> (Arc<Connection>, mpsc::Receiver<OutboundFrame>) {
        let (tx, rx) = mpsc::channel(4);
        let conn = Arc::new(Connection::new(RouteKey::post(path).unwrap(), None, tx));
        conn.mark_open();
        (conn, rx)
    }

    #[test]
    fn unary_context_has_no_connection() {
        let ctx = InvocationContext::unary(
            RouteKey::post("/foo").unwrap(),
            None,
            Arc::new(InMemoryConnectionRegistry::new()),
        );
        assert!(ctx.connection().is_none());
        assert_eq!(ctx.transport(), TransportMode::Http);
        assert!(!ctx.is_initial());
    }

    #[test]
    fn connection_context_exposes_its_own_connection() {
        let (conn, _rx) = open_conn("/quux");
        let ctx = InvocationContext::for_connection(
            conn.clone(),
            Some(Principal::new("foo")),
            true,
            Arc::new(InMemoryConnectionRegistry::new()),
        );
        assert_eq!(ctx.connection().map(|c| c.id()), Some(conn.id()));
        assert_eq!(ctx.route(), conn.route());
        assert_eq!(ctx.transport(), TransportMode::WebSocket);
        assert_eq!(ctx.principal().map(|p| p.username.as_str()), Some("foo"));
        assert!(ctx.is_initial());
    }

    #[tokio::test]
    async fn peers_exclude_the_caller() {
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let (me, _rx_me) = open_conn("/quux");
        let (other, _rx_other) = open_conn("/quux");
        registry.join(me.clone()).await;
        registry.join(other.clone()).await;

        let ctx = InvocationContext::for_connection(me.clone(), None, false, registry);
        let peers = ctx.peers().await;
        assert_eq!(peers.len(), 1);
        assert!(peers.contains(other.id()));
        assert!(!peers.contains(me.id()));
    }

    #[test]
    fn reply_from_value_is_json() {
        assert_eq!(Reply::from(json!(1)), Reply::Json(json!(1)));
        assert!(Reply::Empty.is_empty());
    }
}
