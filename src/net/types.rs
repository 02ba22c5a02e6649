//! Wire DTOs for the session backend.
//!
//! DESIGN
//! ======
//! Field names mirror the backend's JSON (`camelCase` on the login payload)
//! so serde round-trips stay lossless.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// The signed-in user as returned by `GET /api/auth/me`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identity-provider user id.
    pub uid: String,
    /// Display name.
    pub name: String,
    /// Primary email address.
    pub email: String,
    /// Whether the account carries the admin claim.
    #[serde(default)]
    pub admin: bool,
}

/// Body of `POST /api/auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest<'a> {
    pub id_token: &'a str,
    pub csrf_token: &'a str,
}

/// Body of a successful `POST /api/auth/login`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    /// Session lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
}
