//! KeepaliveHooks - application-level `{"cmd":"PING"}` heartbeat.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::command::ServerMessage;
use crate::domain::connection::{Connection, ConnectionContext, ConnectionState, TimerHandle};
use crate::ports::LifecycleHooks;

/// Context key under which the heartbeat timer is stored.
pub const KEEPALIVE_TIMER: &str = "keepalive";

/// Sends `{"cmd":"PING"}` every `interval` while the connection is open.
///
/// The timer lives in the connection's own context and is cancelled from
/// there on disconnect. It holds only a weak reference to the connection.
#[derive(Debug, Clone)]
pub struct KeepaliveHooks {
    interval: Duration,
}

impl KeepaliveHooks {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

#[async_trait]
impl LifecycleHooks for KeepaliveHooks {
    async fn connect(&self, connection: &Arc<Connection>, ctx: &mut ConnectionContext) {
        let conn = Arc::downgrade(connection);
        let timer = TimerHandle::spawn_interval(self.interval, move || {
            let Some(conn) = conn.upgrade() else {
                return false;
            };
            if conn.state() == ConnectionState::Closed {
                return false;
            }
            // not open yet or closing: skip this beat
            conn.send_json(&ServerMessage::Ping);
            true
        });
        ctx.insert_timer(KEEPALIVE_TIMER, timer);
    }

    async fn disconnect(&self, connection: &Connection, ctx: &mut ConnectionContext) {
        if ctx.cancel_timer(KEEPALIVE_TIMER) {
            tracing::debug!(connection_id = %connection.id(), "keepalive stopped");
        }
    }
}
