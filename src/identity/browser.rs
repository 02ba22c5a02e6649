//! `web-sys` backed collaborators for [`super::OidcRedirectProvider`].
//!
//! Browser handles are looked up on every call rather than stored, which
//! keeps these types `Send + Sync`. On the server build they report the
//! browser as unavailable.

#[cfg(test)]
#[path = "browser_test.rs"]
mod browser_test;

use super::IdentityError;
use super::redirect::{BrowserLocation, RedirectStore};

/// Session storage key for the pending sign-in record.
pub const PENDING_REDIRECT_KEY: &str = "portal.pending_redirect";

/// Pending sign-in kept in `window.sessionStorage` (per tab).
#[derive(Clone, Debug)]
pub struct SessionStorageStore {
    #[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
    key: String,
}

impl Default for SessionStorageStore {
    fn default() -> Self {
        Self { key: PENDING_REDIRECT_KEY.to_owned() }
    }
}

#[cfg(feature = "hydrate")]
fn browser_error(e: &wasm_bindgen::JsValue) -> IdentityError {
    IdentityError::Browser(format!("{e:?}"))
}

#[cfg(feature = "hydrate")]
fn session_storage() -> Result<web_sys::Storage, IdentityError> {
    let window = web_sys::window().ok_or_else(|| IdentityError::Browser("no window".to_owned()))?;
    window
        .session_storage()
        .map_err(|e| browser_error(&e))?
        .ok_or_else(|| IdentityError::Browser("session storage unavailable".to_owned()))
}

impl RedirectStore for SessionStorageStore {
    fn load(&self) -> Result<Option<String>, IdentityError> {
        #[cfg(feature = "hydrate")]
        {
            session_storage()?.get_item(&self.key).map_err(|e| browser_error(&e))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Ok(None)
        }
    }

    fn save(&self, value: &str) -> Result<(), IdentityError> {
        #[cfg(feature = "hydrate")]
        {
            session_storage()?.set_item(&self.key, value).map_err(|e| browser_error(&e))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = value;
            Err(IdentityError::Browser("not available on server".to_owned()))
        }
    }

    fn clear(&self) -> Result<(), IdentityError> {
        #[cfg(feature = "hydrate")]
        {
            session_storage()?.remove_item(&self.key).map_err(|e| browser_error(&e))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Ok(())
        }
    }
}

/// `window.location` and `window.history`.
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowLocation;

impl BrowserLocation for WindowLocation {
    fn assign(&self, url: &str) -> Result<(), IdentityError> {
        #[cfg(feature = "hydrate")]
        {
            let window = web_sys::window().ok_or_else(|| IdentityError::Browser("no window".to_owned()))?;
            window.location().assign(url).map_err(|e| browser_error(&e))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = url;
            Err(IdentityError::Browser("not available on server".to_owned()))
        }
    }

    fn fragment(&self) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            let hash = web_sys::window()?.location().hash().ok()?;
            let fragment = hash.trim_start_matches('#');
            (!fragment.is_empty()).then(|| fragment.to_owned())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            None
        }
    }

    fn clear_fragment(&self) -> Result<(), IdentityError> {
        #[cfg(feature = "hydrate")]
        {
            let window = web_sys::window().ok_or_else(|| IdentityError::Browser("no window".to_owned()))?;
            let location = window.location();
            if location.hash().map_err(|e| browser_error(&e))?.is_empty() {
                return Ok(());
            }
            let path = location.pathname().map_err(|e| browser_error(&e))?;
            let search = location.search().map_err(|e| browser_error(&e))?;
            window
                .history()
                .map_err(|e| browser_error(&e))?
                .replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&format!("{path}{search}")))
                .map_err(|e| browser_error(&e))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Ok(())
        }
    }

    fn origin(&self) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            web_sys::window()?.location().origin().ok()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            None
        }
    }
}
