//! Handle to one upgraded transport session.

use serde::Serialize;
use tokio::sync::mpsc;

use crate::domain::foundation::{ConnectionId, RouteKey, Timestamp};

use super::state::{ConnectionState, StateCell};

/// A frame queued for the transport writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    Text(String),
    /// Transport-level keepalive ping.
    Ping,
    /// Close the transport after flushing earlier frames.
    Close,
}

/// Handle to an upgraded connection bound to a route.
///
/// Sends are best-effort: they only enqueue while the connection is open and
/// never wait for the writer. A full queue or a closed connection drops the
/// frame and returns `false`.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    route: RouteKey,
    subprotocol: Option<String>,
    connected_at: Timestamp,
    state: StateCell,
    outbound: mpsc::Sender<OutboundFrame>,
}

impl Connection {
    /// Creates a connection in the `Connecting` state.
    pub fn new(
        route: RouteKey,
        subprotocol: Option<String>,
        outbound: mpsc::Sender<OutboundFrame>,
    ) -> Self {
        Self {
            id: ConnectionId::new(),
            route,
            subprotocol,
            connected_at: Timestamp::now(),
            state: StateCell::new(ConnectionState::Connecting),
            outbound,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn route(&self) -> &RouteKey {
        &self.route
    }

    /// Subprotocol negotiated at upgrade, if any.
    pub fn subprotocol(&self) -> Option<&str> {
        self.subprotocol.as_deref()
    }

    pub fn connected_at(&self) -> Timestamp {
        self.connected_at
    }

    pub fn state(&self) -> ConnectionState {
        self.state.load()
    }

    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    /// Marks the upgrade as complete.
    pub fn mark_open(&self) -> bool {
        self.state.transition(ConnectionState::Open)
    }

    /// Moves the connection to `Closed`.
    ///
    /// Returns `true` only for the single caller that performed the move.
    pub fn mark_closed(&self) -> bool {
        self.state.transition(ConnectionState::Closed)
    }

    /// Starts a server-side close: no further sends are accepted and a close
    /// frame is queued behind anything already enqueued.
    pub fn close(&self) -> bool {
        if !self.state.transition(ConnectionState::Closing) {
            return false;
        }
        // A full queue means the writer is stalled; teardown aborts it.
        let _ = self.outbound.try_send(OutboundFrame::Close);
        true
    }

    pub fn send_text(&self, text: impl Into<String>) -> bool {
        self.enqueue(OutboundFrame::Text(text.into()))
    }

    /// Serializes `value` as JSON and sends it as a text frame.
    pub fn send_json<T: Serialize + ?Sized>(&self, value: &T) -> bool {
        match serde_json::to_string(value) {
            Ok(json) => self.send_text(json),
            Err(e) => {
                tracing::debug!(connection_id = %self.id, error = %e, "failed to serialize frame");
                false
            }
        }
    }

    /// Sends a transport-level ping.
    pub fn send_ping(&self) -> bool {
        self.enqueue(OutboundFrame::Ping)
    }

    fn enqueue(&self, frame: OutboundFrame) -> bool {
        if !self.is_open() {
            return false;
        }
        self.outbound.try_send(frame).is_ok()
    }
}
