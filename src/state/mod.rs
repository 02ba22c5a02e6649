//! Client-side session state.
//!
//! DESIGN
//! ======
//! `session` holds the value type; `context` wires it (and the auth service)
//! into Leptos context for the views under the authentication boundary.

pub mod context;
pub mod session;
