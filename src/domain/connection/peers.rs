//! Snapshot of the other open connections on a route.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::ConnectionId;

use super::handle::Connection;

/// Open connections on one route, captured at the time of the call.
///
/// The set is read-only: connections that join or leave afterwards are not
/// reflected, and sending to a peer that has since closed is a no-op.
#[derive(Debug, Clone, Default)]
pub struct PeerSet {
    members: Vec<Arc<Connection>>,
}

impl PeerSet {
    /// Builds a snapshot, keeping only connections that are still open.
    pub fn new(members: impl IntoIterator<Item = Arc<Connection>>) -> Self {
        Self {
            members: members.into_iter().filter(|c| c.is_open()).collect(),
        }
    }

    /// Removes `id` from the set.
    pub fn excluding(mut self, id: ConnectionId) -> Self {
        self.members.retain(|c| c.id() != id);
        self
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.members.iter().any(|c| c.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Connection>> {
        self.members.iter()
    }

    /// Sends `message` to every peer, serializing it once.
    ///
    /// Returns how many peers accepted the frame.
    pub fn broadcast_json<T: Serialize + ?Sized>(&self, message: &T) -> usize {
        let text = match serde_json::to_string(message) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize broadcast");
                return 0;
            }
        };
        self.members
            .iter()
            .filter(|peer| peer.send_text(text.clone()))
            .count()
    }
}
