//! Upgrade detection from request headers.

use axum::http::header::{SEC_WEBSOCKET_PROTOCOL, UPGRADE};
use axum::http::HeaderMap;

use crate::domain::protocol::InboundRequest;

/// Classifies a request as plain or upgrade-requesting.
pub fn inbound_request(headers: &HeaderMap) -> InboundRequest {
    if is_upgrade_request(headers) {
        InboundRequest::upgrade(offered_protocols(headers))
    } else {
        InboundRequest::plain()
    }
}

/// True when an `Upgrade` header lists `websocket`.
pub fn is_upgrade_request(headers: &HeaderMap) -> bool {
    headers
        .get_all(UPGRADE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .any(|token| token.trim().eq_ignore_ascii_case("websocket"))
}

/// Subprotocols listed in `Sec-WebSocket-Protocol`, in offer order.
pub fn offered_protocols(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(SEC_WEBSOCKET_PROTOCOL)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}
