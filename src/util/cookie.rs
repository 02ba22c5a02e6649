//! Cookie lookup for the anti-forgery token.
//!
//! The backend sets `csrfToken` as a script-readable cookie; the sign-in
//! handshake echoes it back in the login payload.

#[cfg(test)]
#[path = "cookie_test.rs"]
mod cookie_test;

/// Read-only view of the cookies visible to the page.
pub trait CookieSource: Send + Sync {
    /// Value of cookie `name`, or `None` when absent or empty.
    fn get(&self, name: &str) -> Option<String>;
}

/// `document.cookie` in the browser. Always empty on the server.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentCookies;

impl CookieSource for DocumentCookies {
    fn get(&self, name: &str) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            use wasm_bindgen::JsCast;

            let document = web_sys::window()?.document()?;
            let html = document.dyn_into::<web_sys::HtmlDocument>().ok()?;
            let raw = html.cookie().ok()?;
            parse_cookie(&raw, name)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = name;
            None
        }
    }
}

/// Find `name` in a `document.cookie` style string (`a=1; b=2`).
///
/// Pairs are split before percent-decoding, so an encoded `;` or `=` inside
/// one value cannot forge another cookie. Values may themselves contain `=`.
#[must_use]
pub fn parse_cookie(raw: &str, name: &str) -> Option<String> {
    let decode = |part: &str| urlencoding::decode(part).map_or_else(|_| part.to_owned(), |d| d.into_owned());
    raw.split(';')
        .filter_map(|pair| pair.trim_start().split_once('='))
        .find(|(key, _)| decode(key) == name)
        .map(|(_, value)| decode(value.trim_end()))
        .filter(|value| !value.is_empty())
}
