//! Error taxonomy for remote calls.
//!
//! Every failure that can reach the error channel is one of four classes:
//! an authentication failure (which never surfaces as text and instead
//! invalidates the session), a server-side rejection carrying a message, a
//! transport-level failure, or a local input failure detected before any
//! call is issued.

use miette::Diagnostic;
use thiserror::Error;

/// A classified failure from (or on the way to) the remote store.
#[derive(Debug, Error, Diagnostic)]
pub enum ApiError {
    /// The session token is missing, invalid, or expired.
    ///
    /// This class never produces a user-facing message; the engine reacts
    /// by discarding the session entirely.
    #[error("session token rejected by the server")]
    #[diagnostic(
        code(flowdeck::api::unauthorized),
        help("Log in again to establish a fresh session.")
    )]
    Unauthorized,

    /// The server rejected the request with a non-auth error status.
    ///
    /// `message` is the `detail` field of the error body when present,
    /// otherwise a synthesized status line; it surfaces to the user
    /// verbatim.
    #[error("server rejected request ({status}): {message}")]
    #[diagnostic(code(flowdeck::api::rejected))]
    Api { status: u16, message: String },

    /// Network-level failure: connection, timeout, or a malformed body on
    /// an otherwise successful response.
    #[error("transport error: {0}")]
    #[diagnostic(code(flowdeck::api::transport))]
    Transport(#[from] reqwest::Error),

    /// Invalid local input, detected before any call was issued.
    #[error("{0}")]
    #[diagnostic(code(flowdeck::api::invalid_input))]
    InvalidInput(String),
}

impl ApiError {
    /// Returns `true` for the authentication-failure class.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// The user-facing message for this failure, or `None` when the
    /// failure must not surface as text (authentication class).
    #[must_use]
    pub fn surface_message(&self) -> Option<String> {
        match self {
            ApiError::Unauthorized => None,
            other => Some(other.to_string()),
        }
    }
}
