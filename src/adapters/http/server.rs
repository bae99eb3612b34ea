//! Process-level wiring: dispatcher assembly and the serve loop.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::adapters::auth::StaticCredentialValidator;
use crate::adapters::websocket::InMemoryConnectionRegistry;
use crate::application::{default_routes, Dispatcher};
use crate::config::{AppConfig, ConfigError};
use crate::domain::foundation::ValidationError;

use super::dispatch::DispatchState;
use super::router::dispatch_router;

/// Errors that stop the process before or while serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid route table: {0}")]
    Routes(#[from] ValidationError),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Builds the dispatcher for the default route table.
pub fn build_dispatcher(config: &AppConfig) -> Result<Arc<Dispatcher>, ValidationError> {
    let routes = default_routes(&config.websocket)?;
    let registry = Arc::new(InMemoryConnectionRegistry::new());
    let validator = Arc::new(StaticCredentialValidator::from_config(&config.auth));
    Ok(Arc::new(Dispatcher::new(routes, registry, validator)))
}

/// Builds the complete axum application.
pub fn app(config: &AppConfig) -> Result<Router, StartupError> {
    let dispatcher = build_dispatcher(config)?;
    let state = DispatchState::new(dispatcher, config.websocket.outbound_capacity);
    Ok(dispatch_router(state))
}

/// Serves `router` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "server listening");
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
