//! In-memory connection registry grouped by route.
//!
//! # Architecture
//!
//! ```text
//! Route: POST /quux      Route: POST /bar
//! ├── conn-a             └── conn-d
//! ├── conn-b
//! └── conn-c
//! ```
//!
//! A handler on conn-a asking for peers gets a snapshot of b and c.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::connection::{Connection, PeerSet};
use crate::domain::foundation::{ConnectionId, RouteKey};
use crate::ports::ConnectionRegistry;

/// Tracks upgraded connections for a single process.
///
/// # Thread Safety
///
/// Uses `RwLock` for the route map since snapshot reads (broadcasts)
/// outnumber joins/leaves. Snapshots are cloned out under the read lock, so
/// sending never happens while the lock is held.
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    /// route → connection_id → connection
    routes: RwLock<HashMap<RouteKey, HashMap<ConnectionId, Arc<Connection>>>>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes that currently have at least one connection.
    pub async fn active_routes(&self) -> Vec<RouteKey> {
        self.routes.read().await.keys().cloned().collect()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn join(&self, connection: Arc<Connection>) {
        let mut routes = self.routes.write().await;
        routes
            .entry(connection.route().clone())
            .or_default()
            .insert(connection.id(), connection);
    }

    async fn leave(&self, connection: &Connection) -> bool {
        let mut routes = self.routes.write().await;
        let Some(members) = routes.get_mut(connection.route()) else {
            return false;
        };

        let removed = members.remove(&connection.id()).is_some();
        if members.is_empty() {
            routes.remove(connection.route());
        }
        removed
    }

    async fn peers(&self, route: &RouteKey) -> PeerSet {
        let routes = self.routes.read().await;
        match routes.get(route) {
            Some(members) => PeerSet::new(members.values().cloned()),
            None => PeerSet::default(),
        }
    }

    async fn connection_count(&self, route: &RouteKey) -> usize {
        self.routes
            .read()
            .await
            .get(route)
            .map(HashMap::len)
            .unwrap_or(0)
    }

    async fn total_connections(&self) -> usize {
        self.routes.read().await.values().map(HashMap::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::connection::OutboundFrame;
    use tokio::sync::mpsc;

    fn open_conn(path: &str) -> (Arc<Connection>, mpsc::Receiver<OutboundFrame>) {
        let (tx, rx) = mpsc::channel(8);
        let conn = Arc::new(Connection::new(RouteKey::post(path).unwrap(), None, tx));
        conn.mark_open();
        (conn, rx)
    }

    #[tokio::test]
    async fn join_groups_connections_by_route() {
        let registry = InMemoryConnectionRegistry::new();
        let (a, _ra) = open_conn("/quux");
        let (b, _rb) = open_conn("/quux");
        let (c, _rc) = open_conn("/bar");

        registry.join(a.clone()).await;
        registry.join(b).await;
        registry.join(c).await;

        assert_eq!(registry.connection_count(a.route()).await, 2);
        assert_eq!(
            registry
                .connection_count(&RouteKey::post("/bar").unwrap())
                .await,
            1
        );
        assert_eq!(registry.total_connections().await, 3);
        assert_eq!(registry.active_routes().await.len(), 2);
    }

    #[tokio::test]
    async fn leave_removes_connection_and_empty_route() {
        let registry = InMemoryConnectionRegistry::new();
        let (a, _ra) = open_conn("/quux");
        registry.join(a.clone()).await;

        assert!(registry.leave(&a).await);
        assert!(!registry.leave(&a).await);
        assert_eq!(registry.total_connections().await, 0);
        assert!(registry.active_routes().await.is_empty());
    }

    #[tokio::test]
    async fn peers_are_isolated_per_route() {
        let registry = InMemoryConnectionRegistry::new();
        let (a, _ra) = open_conn("/quux");
        let (b, _rb) = open_conn("/bar");
        registry.join(a.clone()).await;
        registry.join(b.clone()).await;

        let peers = registry.peers(a.route()).await;
        assert_eq!(peers.len(), 1);
        assert!(peers.contains(a.id()));
        assert!(!peers.contains(b.id()));
    }

    #[tokio::test]
    async fn snapshot_is_not_affected_by_later_leave() {
        let registry = InMemoryConnectionRegistry::new();
        let (a, _ra) = open_conn("/quux");
        let (b, _rb) = open_conn("/quux");
        registry.join(a.clone()).await;
        registry.join(b.clone()).await;

        let snapshot = registry.peers(a.route()).await;
        registry.leave(&b).await;

        assert_eq!(snapshot.len(), 2);
        assert_eq!(registry.peers(a.route()).await.len(), 1);
    }

    #[tokio::test]
    async fn peers_skip_closing_connections() {
        let registry = InMemoryConnectionRegistry::new();
        let (a, _ra) = open_conn("/quux");
        let (b, _rb) = open_conn("/quux");
        registry.join(a.clone()).await;
        registry.join(b.clone()).await;

        b.close();
        let peers = registry.peers(a.route()).await;
        assert_eq!(peers.len(), 1);
        assert!(peers.contains(a.id()));
    }

    #[tokio::test]
    async fn unknown_route_has_no_peers() {
        let registry = InMemoryConnectionRegistry::new();
        let route = RouteKey::post("/nobody").unwrap();
        assert!(registry.peers(&route).await.is_empty());
        assert_eq!(registry.connection_count(&route).await, 0);
    }
}
