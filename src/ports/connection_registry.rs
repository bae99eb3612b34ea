//! ConnectionRegistry port - tracks open connections per route.
//!
//! The registry is the only shared state between connection tasks. It is
//! mutated on join/leave and otherwise read through [`PeerSet`] snapshots, so
//! handlers never iterate a collection that is changing underneath them.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::connection::{Connection, PeerSet};
use crate::domain::foundation::RouteKey;

/// Port for tracking upgraded connections grouped by route.
///
/// # Example
///
/// ```ignore
/// // session start
/// registry.join(conn.clone()).await;
///
/// // inside a handler
/// let peers = registry.peers(conn.route()).await;
/// peers.broadcast_json(&ServerMessage::Awake);
///
/// // session end
/// registry.leave(&conn).await;
/// ```
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Adds a connection under its route.
    async fn join(&self, connection: Arc<Connection>);

    /// Removes a connection. Returns `false` if it was not registered.
    async fn leave(&self, connection: &Connection) -> bool;

    /// Snapshot of the open connections on `route`.
    async fn peers(&self, route: &RouteKey) -> PeerSet;

    /// Number of registered connections on `route`.
    async fn connection_count(&self, route: &RouteKey) -> usize;

    /// Number of registered connections across all routes.
    async fn total_connections(&self) -> usize;
}
