//! The single endpoint every route path is mounted on.
//!
//! ```text
//! route lookup → Basic credentials → authenticate → payload → negotiate
//!     ├── Unary   → handler → 200 JSON / 204
//!     └── Upgrade → WebSocket handshake → run_session
//! ```

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{ws::WebSocketUpgrade, MatchedPath, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::adapters::websocket::{run_session, SessionSetup};
use crate::application::Dispatcher;
use crate::domain::foundation::DispatchError;
use crate::domain::protocol::Negotiated;
use crate::ports::Reply;

use super::credentials::basic_credentials;
use super::error::ApiError;
use super::upgrade::inbound_request;

/// Shared state for the dispatch endpoint.
#[derive(Clone)]
pub struct DispatchState {
    pub dispatcher: Arc<Dispatcher>,
    /// Per-connection outbound queue size.
    pub outbound_capacity: usize,
}

impl DispatchState {
    pub fn new(dispatcher: Arc<Dispatcher>, outbound_capacity: usize) -> Self {
        Self {
            dispatcher,
            outbound_capacity,
        }
    }
}

/// Serves both plain `POST` calls and `GET` WebSocket handshakes.
///
/// A handshake on a route path is an upgrade of that route's `POST`.
pub async fn dispatch(
    State(state): State<DispatchState>,
    method: Method,
    path: MatchedPath,
    headers: HeaderMap,
    ws: Option<WebSocketUpgrade>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let dispatcher = &state.dispatcher;
    let route = dispatcher.route(path.as_str())?;

    let credentials = if route.auth_required() {
        basic_credentials(&headers).map_err(DispatchError::from)?
    } else {
        None
    };
    let principal = dispatcher
        .authenticate(&route, credentials.as_ref())
        .await?;

    let request = inbound_request(&headers);
    if !request.upgrade && method != Method::POST {
        return Err(DispatchError::MethodNotAllowed.into());
    }
    let payload = if request.upgrade {
        None
    } else {
        parse_payload(&headers, &body)?
    };

    match dispatcher.negotiate(&route, &request)? {
        Negotiated::Unary => {
            let reply = dispatcher.invoke_unary(&route, principal, payload).await?;
            Ok(match reply {
                Reply::Json(body) => (StatusCode::OK, Json(body)).into_response(),
                Reply::Empty => StatusCode::NO_CONTENT.into_response(),
            })
        }
        Negotiated::Upgrade(plan) => {
            let Some(ws) = ws else {
                return Err(DispatchError::protocol("invalid WebSocket handshake").into());
            };
            let ws = match &plan.subprotocol {
                Some(subprotocol) => ws.protocols([subprotocol.clone()]),
                None => ws,
            };

            let setup = SessionSetup {
                dispatcher: state.dispatcher.clone(),
                route,
                plan,
                principal,
                outbound_capacity: state.outbound_capacity,
            };
            Ok(ws.on_upgrade(move |socket| run_session(socket, setup)))
        }
    }
}

/// Parses a plain request body.
///
/// An empty body is no payload. Anything else must be `application/json`.
fn parse_payload(headers: &HeaderMap, body: &Bytes) -> Result<Option<Value>, DispatchError> {
    if body.is_empty() {
        return Ok(None);
    }

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let mime = content_type.split(';').next().unwrap_or_default().trim();
    if !mime.eq_ignore_ascii_case("application/json") {
        let shown = if mime.is_empty() { "none" } else { mime };
        return Err(DispatchError::UnsupportedMediaType(shown.to_string()));
    }

    serde_json::from_slice(body)
        .map(Some)
        .map_err(|_| DispatchError::payload("invalid JSON payload"))
}
