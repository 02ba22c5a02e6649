//! Reusable UI components.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth_provider` is the authentication boundary every routed page renders
//! under; `social_login_button` starts provider sign-ins from the login page.

pub mod auth_provider;
pub mod social_login_button;
