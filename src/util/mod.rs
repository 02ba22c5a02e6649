//! Utility helpers shared across pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser concerns (cookies) and route-level
//! policies (the session guard) from page logic.

pub mod cookie;
pub mod route_guard;
