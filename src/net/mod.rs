//! Networking modules for the session backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http` owns request/response mechanics, `error` the status-to-error
//! mapping, and `types` the shared wire schema.

pub mod error;
pub mod http;
pub mod types;
