//! Immutable route descriptors and the table they are registered in.
//!
//! Routes are assembled with [`Route::builder`] and validated once at
//! registration. After that they are shared as `Arc<Route>` and never change.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::foundation::{RouteKey, ValidationError};
use crate::domain::framing::{FramingCodec, FramingConfig};
use crate::domain::protocol::{ProtocolOptions, RouteMode};
use crate::ports::{LifecycleHooks, RouteHandler};

/// A registered endpoint.
pub struct Route {
    key: RouteKey,
    auth_required: bool,
    protocol: ProtocolOptions,
    handler: Arc<dyn RouteHandler>,
    hooks: Option<Arc<dyn LifecycleHooks>>,
}

impl Route {
    /// Starts a `POST` route on `path`.
    pub fn builder(path: impl Into<String>) -> RouteBuilder {
        RouteBuilder::new(path)
    }

    pub fn key(&self) -> &RouteKey {
        &self.key
    }

    pub fn path(&self) -> &str {
        self.key.path()
    }

    pub fn auth_required(&self) -> bool {
        self.auth_required
    }

    pub fn mode(&self) -> RouteMode {
        self.protocol.mode
    }

    pub fn protocol(&self) -> &ProtocolOptions {
        &self.protocol
    }

    pub fn handler(&self) -> &Arc<dyn RouteHandler> {
        &self.handler
    }

    pub fn hooks(&self) -> Option<&Arc<dyn LifecycleHooks>> {
        self.hooks.as_ref()
    }

    /// Codec for connection-bound payloads, if the route is framed.
    pub fn codec(&self) -> Option<FramingCodec> {
        self.protocol.framing.clone().map(FramingCodec::new)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("key", &self.key)
            .field("auth_required", &self.auth_required)
            .field("protocol", &self.protocol)
            .field("hooks", &self.hooks.is_some())
            .finish()
    }
}

/// Builder for [`Route`].
pub struct RouteBuilder {
    path: String,
    auth_required: bool,
    protocol: ProtocolOptions,
    handler: Option<Arc<dyn RouteHandler>>,
    hooks: Option<Arc<dyn LifecycleHooks>>,
}

impl RouteBuilder {
    fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            auth_required: false,
            protocol: ProtocolOptions::unary(),
            handler: None,
            hooks: None,
        }
    }

    pub fn mode(mut self, mode: RouteMode) -> Self {
        self.protocol.mode = mode;
        self
    }

    /// Requires Basic credentials on every request.
    pub fn auth_required(mut self) -> Self {
        self.auth_required = true;
        self
    }

    /// Delivers a synthetic initial invocation right after upgrade.
    pub fn initially(mut self) -> Self {
        self.protocol.initially = true;
        self
    }

    pub fn autoping(mut self, interval: Duration) -> Self {
        self.protocol.autoping = Some(interval);
        self
    }

    pub fn subprotocol(mut self, subprotocol: impl Into<String>) -> Self {
        self.protocol.subprotocol = Some(subprotocol.into());
        self
    }

    pub fn framing(mut self, framing: FramingConfig) -> Self {
        self.protocol.framing = Some(framing);
        self
    }

    pub fn hooks<H>(mut self, hooks: H) -> Self
    where
        H: LifecycleHooks + 'static,
    {
        self.hooks = Some(Arc::new(hooks));
        self
    }

    pub fn handler<H>(mut self, handler: H) -> Self
    where
        H: RouteHandler + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Validates and freezes the route.
    ///
    /// # Errors
    ///
    /// - the path is empty, lacks a leading `/` or contains whitespace
    /// - no handler was set
    /// - connection options (initially, autoping, subprotocol, framing,
    ///   hooks) are set on a unary route
    /// - a subprotocol is set on a route that is not upgrade-only
    pub fn build(self) -> Result<Route, ValidationError> {
        let key = RouteKey::post(self.path)?;
        let handler = self
            .handler
            .ok_or_else(|| ValidationError::empty_field("handler"))?;

        self.protocol.validate()?;

        if self.hooks.is_some() && !self.protocol.mode.allows_upgrade() {
            return Err(ValidationError::invalid_format(
                "hooks",
                "only valid on routes that accept upgrades",
            ));
        }

        Ok(Route {
            key,
            auth_required: self.auth_required,
            protocol: self.protocol,
            handler,
            hooks: self.hooks,
        })
    }
}

/// Registered routes, looked up by path.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: HashMap<String, Arc<Route>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route.
    ///
    /// # Errors
    ///
    /// Rejects a second route with the same method and path.
    pub fn register(&mut self, route: Route) -> Result<Arc<Route>, ValidationError> {
        let path = route.path().to_string();
        if self.routes.contains_key(&path) {
            return Err(ValidationError::invalid_format(
                "path",
                format!("route already registered for {}", route.key()),
            ));
        }
        let route = Arc::new(route);
        self.routes.insert(path, route.clone());
        Ok(route)
    }

    pub fn get(&self, path: &str) -> Option<Arc<Route>> {
        self.routes.get(path).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Route>> {
        self.routes.values()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
