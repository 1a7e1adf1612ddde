//! Error types for the Link request bridge.
//!
//! # Design
//! `Http` carries every transport-level failure the host reports with
//! `ok: false`. A 401 is not a separate variant: it is an `Http` error that
//! the authenticated flow inspects through `is_unauthorized()` before
//! deciding to refresh. Token acquisition and token refresh get their own
//! variants so a caller can tell "the gateway rejected the call" apart from
//! "the host could not hand out a credential".

use thiserror::Error;

/// Errors produced while building, dispatching or authenticating a request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The host reported `ok: false` for the request.
    #[error("HTTP {status}: {status_text}")]
    Http { status: u16, status_text: String },

    /// The token capability failed to hand out the current token.
    #[error("token acquisition failed: {0}")]
    Token(String),

    /// The token capability failed to refresh the token.
    #[error("token refresh failed: {0}")]
    TokenRefresh(String),

    /// The transport capability could not produce a response envelope.
    #[error("transport failed: {0}")]
    Transport(String),

    /// Structured request data could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A host reply could not be decoded.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    #[error("unsupported HTTP method: {0}")]
    InvalidMethod(String),

    /// An auth flow step was driven out of order.
    #[error("invalid auth flow state: {0}")]
    InvalidState(&'static str),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status carried by the error, if it came from the host transport.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
