//! Sign-in orchestration.
//!
//! SYSTEM CONTEXT
//! ==============
//! `service` wraps the identity provider and backend calls; `handshake`
//! sequences them into a settled session once per boundary mount.

pub mod error;
pub mod handshake;
pub mod service;
