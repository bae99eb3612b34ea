//! Dispatcher facade: route lookup, authentication and negotiation.
//!
//! The HTTP adapter drives a request through these steps in order:
//!
//! ```text
//! route(path) → authenticate(route, credentials) → negotiate(route, request)
//!     ├── Unary   → invoke_unary(route, principal, payload)
//!     └── Upgrade → bind(route, connection, principal) per connection
//! ```
//!
//! Protocol and auth failures are resolved here and never reach a handler.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::connection::Connection;
use crate::domain::foundation::{AuthError, Credentials, DispatchError, Principal};
use crate::domain::protocol::{negotiate, InboundRequest, Negotiated};
use crate::ports::{ConnectionRegistry, CredentialValidator, Reply};

use super::invoker::{BoundInvoker, HandlerInvoker};
use super::route::{Route, RouteTable};

pub struct Dispatcher {
    routes: RouteTable,
    registry: Arc<dyn ConnectionRegistry>,
    validator: Arc<dyn CredentialValidator>,
    invoker: HandlerInvoker,
}

impl Dispatcher {
    pub fn new(
        routes: RouteTable,
        registry: Arc<dyn ConnectionRegistry>,
        validator: Arc<dyn CredentialValidator>,
    ) -> Self {
        let invoker = HandlerInvoker::new(registry.clone());
        Self {
            routes,
            registry,
            validator,
            invoker,
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn registry(&self) -> &Arc<dyn ConnectionRegistry> {
        &self.registry
    }

    /// Looks up the route registered for `path`.
    pub fn route(&self, path: &str) -> Result<Arc<Route>, DispatchError> {
        self.routes
            .get(path)
            .ok_or_else(|| DispatchError::NotFound(path.to_string()))
    }

    /// Checks credentials for routes that require them.
    ///
    /// Routes without `auth_required` ignore any credentials sent and yield
    /// no principal.
    pub async fn authenticate(
        &self,
        route: &Route,
        credentials: Option<&Credentials>,
    ) -> Result<Option<Principal>, DispatchError> {
        if !route.auth_required() {
            return Ok(None);
        }

        let credentials = credentials.ok_or(AuthError::MissingCredentials)?;
        let validation = self
            .validator
            .validate(credentials.identity(), credentials.secret())
            .await?;

        if !validation.valid {
            tracing::warn!(path = %route.path(), identity = %credentials.identity(), "authentication failed");
            return Err(AuthError::InvalidCredentials.into());
        }

        Ok(Some(
            validation
                .principal
                .unwrap_or_else(|| Principal::new(credentials.identity())),
        ))
    }

    /// Classifies the request against the route's protocol options.
    pub fn negotiate(
        &self,
        route: &Route,
        request: &InboundRequest,
    ) -> Result<Negotiated, DispatchError> {
        negotiate(route.protocol(), request).map_err(|e| {
            tracing::warn!(path = %route.path(), upgrade = request.upgrade, error = %e, "request rejected by negotiation");
            e
        })
    }

    pub async fn invoke_unary(
        &self,
        route: &Route,
        principal: Option<Principal>,
        payload: Option<Value>,
    ) -> Result<Reply, DispatchError> {
        self.invoker.unary(route, principal, payload).await
    }

    /// Binds the handler invoker to an established connection.
    pub fn bind(
        &self,
        route: Arc<Route>,
        connection: Arc<Connection>,
        principal: Option<Principal>,
    ) -> BoundInvoker {
        self.invoker.bind(route, connection, principal)
    }
}
