//! # portal
//!
//! Leptos + WASM client for a redirect-based sign-in flow.
//!
//! A visitor picks Google or Apple on the login page and is redirected to the
//! provider. When the provider sends the browser back, the authentication
//! boundary exchanges the identity token for a first-party session cookie,
//! fetches the signed-in user, and shares the result with every page through
//! Leptos context. Protected pages redirect to `/login` when no session
//! exists.

pub mod app;
pub mod auth;
pub mod components;
pub mod config;
pub mod identity;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

#[cfg(test)]
pub(crate) mod test_helpers;

/// Browser entry point.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        leptos::logging::warn!("console logger unavailable: {e}");
    }
    leptos::mount::hydrate_body(app::App);
}
