//! Axum router for the route table.

use axum::http::Uri;
use axum::routing::post;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::domain::foundation::DispatchError;

use super::dispatch::{dispatch, DispatchState};
use super::error::ApiError;

/// Mounts every registered route path for `POST` and `GET`.
///
/// # Routes
///
/// - `POST <path>` - plain request/response
/// - `GET <path>` - WebSocket handshake (upgrade of the `POST` route)
/// - other methods - 405 with a JSON error body
/// - unknown paths - 404 with a JSON error body
pub fn dispatch_router(state: DispatchState) -> Router {
    let mut router = Router::new();
    for route in state.dispatcher.routes().iter() {
        router = router.route(
            route.path(),
            post(dispatch).get(dispatch).fallback(method_not_allowed),
        );
    }

    router
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found(uri: Uri) -> ApiError {
    DispatchError::NotFound(uri.path().to_string()).into()
}

async fn method_not_allowed() -> ApiError {
    DispatchError::MethodNotAllowed.into()
}
