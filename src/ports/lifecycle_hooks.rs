//! Connect/disconnect hooks for upgraded routes.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::connection::{Connection, ConnectionContext};

/// Callbacks run around a connection's lifetime.
///
/// `connect` runs once after the upgrade and before any message reaches the
/// handler. `disconnect` runs once after the last message. Both receive the
/// connection's own [`ConnectionContext`]; timers stored there are cancelled
/// after `disconnect` returns even if the hook forgets to.
#[async_trait]
pub trait LifecycleHooks: Send + Sync {
    async fn connect(&self, _connection: &Arc<Connection>, _ctx: &mut ConnectionContext) {}

    async fn disconnect(&self, _connection: &Connection, _ctx: &mut ConnectionContext) {}
}
