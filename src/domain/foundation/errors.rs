//! Error types for the domain layer.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use super::AuthError;
use crate::domain::framing::CodecError;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField {
            field: field.into(),
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Negotiation errors
    ProtocolViolation,
    MethodNotAllowed,
    NotFound,

    // Authorization errors
    Unauthorized,
    Forbidden,
    ServiceUnavailable,

    // Payload errors
    InvalidPayload,
    UnsupportedMediaType,
    FrameRejected,

    // Handler errors
    BadRequest,
    Conflict,
    InternalError,
}

impl ErrorCode {
    /// HTTP-equivalent status for this code.
    pub fn status(self) -> u16 {
        match self {
            ErrorCode::ProtocolViolation
            | ErrorCode::InvalidPayload
            | ErrorCode::FrameRejected
            | ErrorCode::BadRequest => 400,
            ErrorCode::Unauthorized => 401,
            ErrorCode::Forbidden => 403,
            ErrorCode::NotFound => 404,
            ErrorCode::MethodNotAllowed => 405,
            ErrorCode::Conflict => 409,
            ErrorCode::UnsupportedMediaType => 415,
            ErrorCode::InternalError => 500,
            ErrorCode::ServiceUnavailable => 503,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ProtocolViolation => "PROTOCOL_VIOLATION",
            ErrorCode::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ErrorCode::InvalidPayload => "INVALID_PAYLOAD",
            ErrorCode::UnsupportedMediaType => "UNSUPPORTED_MEDIA_TYPE",
            ErrorCode::FrameRejected => "FRAME_REJECTED",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Every failure the dispatch pipeline can surface to a caller.
///
/// `Protocol` and `Auth` are resolved before any handler runs. The rest are
/// reported to the caller while an established connection stays open.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// Upgrade requested/forbidden mismatch or subprotocol mismatch.
    #[error("{0}")]
    Protocol(String),

    /// Missing or rejected credentials.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Malformed payload or missing/invalid required field.
    #[error("{0}")]
    Payload(String),

    /// Request body with a content type other than JSON.
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Framing envelope rejected by the codec.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Explicit error returned by handler logic, surfaced verbatim.
    #[error("{message}")]
    Handler { code: ErrorCode, message: String },

    /// No route is registered for the path.
    #[error("No route for {0}")]
    NotFound(String),

    /// The method cannot be used on this path.
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl DispatchError {
    /// Creates a protocol negotiation error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Creates a payload error.
    pub fn payload(message: impl Into<String>) -> Self {
        Self::Payload(message.into())
    }

    /// Creates a handler-originated bad request.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Handler {
            code: ErrorCode::BadRequest,
            message: message.into(),
        }
    }

    /// Creates a handler-originated internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Handler {
            code: ErrorCode::InternalError,
            message: message.into(),
        }
    }

    /// The error code reported to the caller.
    pub fn code(&self) -> ErrorCode {
        match self {
            DispatchError::Protocol(_) => ErrorCode::ProtocolViolation,
            DispatchError::Auth(AuthError::ServiceUnavailable(_)) => ErrorCode::ServiceUnavailable,
            DispatchError::Auth(_) => ErrorCode::Unauthorized,
            DispatchError::Payload(_) => ErrorCode::InvalidPayload,
            DispatchError::UnsupportedMediaType(_) => ErrorCode::UnsupportedMediaType,
            DispatchError::Codec(_) => ErrorCode::FrameRejected,
            DispatchError::Handler { code, .. } => *code,
            DispatchError::NotFound(_) => ErrorCode::NotFound,
            DispatchError::MethodNotAllowed => ErrorCode::MethodNotAllowed,
        }
    }

    /// HTTP-equivalent status code.
    pub fn status(&self) -> u16 {
        self.code().status()
    }

    /// True for errors that prevent a connection from being established.
    pub fn rejects_upgrade(&self) -> bool {
        matches!(
            self,
            DispatchError::Protocol(_) | DispatchError::Auth(_) | DispatchError::NotFound(_)
        )
    }

    /// Client-visible structured body for this error.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            status_code: self.status(),
            error_code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

/// Structured error sent as an HTTP body or a WebSocket error frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub error_code: String,
    pub message: String,
}
