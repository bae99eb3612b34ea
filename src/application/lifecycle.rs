//! Lifecycle hook runner.
//!
//! Wraps a route's [`LifecycleHooks`] for one connection and owns that
//! connection's [`ConnectionContext`]. Guarantees:
//! - `connect` runs at most once
//! - `disconnect` runs only for the call that moves the connection to
//!   `Closed`, so concurrent close attempts run it once
//! - every timer left in the context is cancelled after `disconnect`

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::connection::{Connection, ConnectionContext, TimerHandle};
use crate::ports::LifecycleHooks;

pub struct ConnectionLifecycle {
    hooks: Option<Arc<dyn LifecycleHooks>>,
    ctx: Mutex<ConnectionContext>,
    connected: AtomicBool,
}

impl ConnectionLifecycle {
    pub fn new(hooks: Option<Arc<dyn LifecycleHooks>>) -> Self {
        Self {
            hooks,
            ctx: Mutex::new(ConnectionContext::new()),
            connected: AtomicBool::new(false),
        }
    }

    /// Runs the connect hook. Later calls are no-ops.
    pub async fn connect(&self, connection: &Arc<Connection>) {
        if self.connected.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(hooks) = &self.hooks {
            let mut ctx = self.ctx.lock().await;
            hooks.connect(connection, &mut ctx).await;
        }
    }

    /// Transitions the connection to `Closed` and runs the disconnect hook.
    ///
    /// Returns `false` without doing anything if another caller already
    /// closed the connection.
    pub async fn disconnect(&self, connection: &Connection) -> bool {
        if !connection.mark_closed() {
            return false;
        }

        let mut ctx = self.ctx.lock().await;
        if let Some(hooks) = &self.hooks {
            hooks.disconnect(connection, &mut ctx).await;
        }
        let leftover = ctx.cancel_all();
        if leftover > 0 {
            tracing::debug!(connection_id = %connection.id(), leftover, "cancelled timers at disconnect");
        }
        true
    }

    /// Stores a runner-owned timer in the connection's context.
    pub async fn insert_timer(&self, name: impl Into<String>, timer: TimerHandle) {
        self.ctx.lock().await.insert_timer(name, timer);
    }

    /// Runs `f` with the connection's context.
    pub async fn with_context<R>(&self, f: impl FnOnce(&mut ConnectionContext) -> R) -> R {
        let mut ctx = self.ctx.lock().await;
        f(&mut ctx)
    }
}
