//! Strongly-typed identifier value objects.

use http::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Unique identifier for an upgraded connection.
///
/// Generated server-side when the upgrade completes; unique per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Creates a new random ConnectionId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a ConnectionId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ConnectionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Identity of a registered route: method plus path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    method: Method,
    path: String,
}

impl RouteKey {
    /// Creates a route key, validating the path.
    pub fn new(method: Method, path: impl Into<String>) -> Result<Self, ValidationError> {
        let path = path.into();
        if path.is_empty() {
            return Err(ValidationError::empty_field("path"));
        }
        if !path.starts_with('/') {
            return Err(ValidationError::invalid_format("path", "must start with '/'"));
        }
        if path.contains(char::is_whitespace) {
            return Err(ValidationError::invalid_format(
                "path",
                "must not contain whitespace",
            ));
        }
        Ok(Self { method, path })
    }

    /// Creates a `POST` route key.
    pub fn post(path: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(Method::POST, path)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}
