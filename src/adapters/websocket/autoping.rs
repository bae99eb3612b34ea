//! Transport-level keepalive for routes with `autoping`.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::connection::{Connection, ConnectionState, TimerHandle};

/// Context key for the autoping timer.
pub const AUTOPING_TIMER: &str = "autoping";

/// Sends a WebSocket Ping frame every `period` until the connection closes.
///
/// Failed sends (queue full, connection closing) are swallowed; a dead peer
/// surfaces as a read error in the session loop.
pub fn spawn_autoping(connection: &Arc<Connection>, period: Duration) -> TimerHandle {
    let conn = Arc::downgrade(connection);
    TimerHandle::spawn_interval(period, move || match conn.upgrade() {
        Some(conn) if conn.state() != ConnectionState::Closed => {
            conn.send_ping();
            true
        }
        _ => false,
    })
}
