//! Session value distributed to views under the authentication boundary.
//!
//! SYSTEM CONTEXT
//! ==============
//! Written once per boundary mount by the redirect handshake, read by route
//! guards and pages. Serializes to the `{user, error, loading}` shape the
//! page components were originally written against.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::net::types::User;

/// Message shown for any unexpected sign-in failure.
pub const SIGN_IN_FAILED_MESSAGE: &str = "An error occurred while signing you in. Please try again.";

/// Outcome of the sign-in handshake as seen by views.
///
/// `Loading` is the only state that can move to another; the handshake
/// never publishes `Loading` after a settled value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Loading,
    /// Settled without a session; not an error.
    Anonymous,
    SignedIn(User),
    /// Settled with a user-facing error message.
    Failed(String),
}

impl Session {
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::SignedIn(user) => Some(user),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Settled with a user and no error.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn(_))
    }
}

impl Serialize for Session {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_struct("Session", 3)?;
        out.serialize_field("user", &self.user())?;
        out.serialize_field("error", &self.error())?;
        out.serialize_field("loading", &self.is_loading())?;
        out.end()
    }
}
