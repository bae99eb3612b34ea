//! Basic credential extraction from the `Authorization` header.

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::domain::foundation::{AuthError, Credentials};

/// Reads `Authorization: Basic <base64(user:pass)>`.
///
/// Returns `Ok(None)` when the header is absent. Any other scheme, bad
/// base64, non-UTF-8 content or a missing `:` is `MalformedCredentials`.
pub fn basic_credentials(headers: &HeaderMap) -> Result<Option<Credentials>, AuthError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| AuthError::MalformedCredentials)?;
    let (scheme, encoded) = value
        .trim()
        .split_once(' ')
        .ok_or(AuthError::MalformedCredentials)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(AuthError::MalformedCredentials);
    }

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| AuthError::MalformedCredentials)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::MalformedCredentials)?;
    let (username, password) = decoded
        .split_once(':')
        .ok_or(AuthError::MalformedCredentials)?;

    Ok(Some(Credentials::new(username, password)))
}
