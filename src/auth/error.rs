//! Errors raised while signing in.

use crate::identity::IdentityError;
use crate::net::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    /// Preconditions for a credential exchange were not met.
    #[error("invalid auth: {0}")]
    InvalidAuth(String),
}

impl AuthError {
    /// Whether the backend answered "no session" (401).
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_unauthenticated())
    }
}
