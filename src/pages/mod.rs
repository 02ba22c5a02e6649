//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page reads the session from context and delegates rendering details
//! to `components`.

pub mod dashboard;
pub mod login;
