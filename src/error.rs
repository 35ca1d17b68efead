//! Error types surfaced by the relay controller.
//!
//! [`ApiError`] is what an HTTP client sees: each variant maps to one
//! status code and one fixed JSON body.  [`SyncError`] covers the boot-time
//! peer fetch and never reaches a client.  Both are `Copy` so they can be
//! carried inside [`AppEvent`](crate::app::events::AppEvent)s.

use core::fmt;

use crate::app::ports::PeerError;

// ---------------------------------------------------------------------------
// API errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    /// Defined route, wrong HTTP verb.
    MethodNotAllowed,
    /// Body is not valid JSON (or too large, or an invalid field value).
    InvalidBody,
    /// `/hostname` value is not a usable hostname.
    InvalidHostname,
    /// No route for this path.
    RouteNotFound,
    /// A setting that only exists in NVS could not be saved.
    StorageUnavailable,
}

impl ApiError {
    pub const fn status(self) -> u16 {
        match self {
            Self::MethodNotAllowed => 405,
            Self::InvalidBody | Self::InvalidHostname => 400,
            Self::RouteNotFound => 404,
            Self::StorageUnavailable => 500,
        }
    }

    /// Fixed JSON error payload.
    pub const fn body(self) -> &'static str {
        match self {
            Self::MethodNotAllowed => r#"{"error":"Unauthorized method"}"#,
            Self::InvalidBody => r#"{"error":"Invalid JSON body"}"#,
            Self::InvalidHostname => r#"{"error":"Invalid hostname"}"#,
            Self::RouteNotFound => r#"{"error":"Content not found"}"#,
            Self::StorageUnavailable => r#"{"error":"Storage unavailable"}"#,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MethodNotAllowed => write!(f, "method not allowed"),
            Self::InvalidBody => write!(f, "invalid body"),
            Self::InvalidHostname => write!(f, "invalid hostname"),
            Self::RouteNotFound => write!(f, "route not found"),
            Self::StorageUnavailable => write!(f, "storage unavailable"),
        }
    }
}

// ---------------------------------------------------------------------------
// Peer sync errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncError {
    Transport,
    Timeout,
    Status(u16),
    BodyTooLarge,
    /// Body is not a JSON object.
    Malformed,
    /// Peer URL does not fit the request buffer.
    UrlTooLong,
}

impl From<PeerError> for SyncError {
    fn from(e: PeerError) -> Self {
        match e {
            PeerError::Transport => Self::Transport,
            PeerError::Timeout => Self::Timeout,
            PeerError::Status(code) => Self::Status(code),
            PeerError::BodyTooLarge => Self::BodyTooLarge,
        }
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => write!(f, "transport error"),
            Self::Timeout => write!(f, "timed out"),
            Self::Status(code) => write!(f, "peer answered HTTP {}", code),
            Self::BodyTooLarge => write!(f, "peer body too large"),
            Self::Malformed => write!(f, "peer body is not a JSON object"),
            Self::UrlTooLong => write!(f, "peer URL too long"),
        }
    }
}
