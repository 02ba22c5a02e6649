//! Error taxonomy for calls against the first-party backend.
//!
//! DESIGN
//! ======
//! Non-2xx responses map onto a closed set of `HttpError` variants keyed by
//! status code. Transport failures collapse into a single opaque
//! `ApiError::Transport` so callers never branch on the browser's fetch error
//! types.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Message shown for transport-level failures.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "An error occurred";

/// Low-level failure reported by a [`super::http::Transport`].
///
/// Only the HTTP client sees this type; it is logged and then replaced by
/// [`ApiError::Transport`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transport failure: {0}")]
pub struct TransportError(pub String);

/// A non-2xx backend response, tagged by status class.
///
/// Every variant carries the message extracted from the response body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HttpError {
    /// `400 Bad Request`.
    #[error("{message}")]
    BadRequest { message: String },
    /// `401 Unauthorized`: no valid session.
    #[error("{message}")]
    Unauthenticated { message: String },
    /// `403 Forbidden`.
    #[error("{message}")]
    Forbidden { message: String },
    /// `404 Not Found`.
    #[error("{message}")]
    NotFound { message: String },
    /// `500 Internal Server Error`.
    #[error("{message}")]
    InternalError { message: String },
    /// Any other non-2xx status.
    #[error("{message}")]
    Unknown { status: u16, message: String },
}

impl HttpError {
    /// Map a response status and its raw body onto the matching variant.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = error_message(body);
        match status {
            400 => Self::BadRequest { message },
            401 => Self::Unauthenticated { message },
            403 => Self::Forbidden { message },
            404 => Self::NotFound { message },
            500 => Self::InternalError { message },
            status => Self::Unknown { status, message },
        }
    }

    /// Numeric status code this error was created from.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::BadRequest { .. } => 400,
            Self::Unauthenticated { .. } => 401,
            Self::Forbidden { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::InternalError { .. } => 500,
            Self::Unknown { status, .. } => *status,
        }
    }

    /// Human-readable message extracted from the response body.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message }
            | Self::Unauthenticated { message }
            | Self::Forbidden { message }
            | Self::NotFound { message }
            | Self::InternalError { message }
            | Self::Unknown { message, .. } => message,
        }
    }
}

/// Errors returned by [`super::http::SessionClient`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (offline, DNS, CORS, ...).
    #[error("An error occurred")]
    Transport,
    /// The backend answered with a non-2xx status.
    #[error(transparent)]
    Http(#[from] HttpError),
    /// A 2xx body was not valid JSON for the expected shape.
    #[error("malformed response body: {0}")]
    Decode(String),
    /// The request body could not be serialized.
    #[error("request body encoding failed: {0}")]
    Encode(String),
}

impl ApiError {
    /// Whether this is the backend's "no session" answer.
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Http(HttpError::Unauthenticated { .. }))
    }
}

/// Pull a display message out of an error body.
///
/// Bodies shaped like `{"message": "..."}` yield the message; anything else
/// (plain text, HTML, JSON without a usable `message`) yields the raw body.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(serde_json::Value::as_str)
                .filter(|message| !message.is_empty())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.to_owned())
}
