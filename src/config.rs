//! Sign-in configuration.
//!
//! The WASM bundle has no process environment, so values are captured at
//! build time with `option_env!` and fed through [`AuthConfig::from_lookup`].
//! Tests drive the same parser with an in-memory lookup.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::identity::ProviderId;

pub const DEFAULT_CSRF_COOKIE: &str = "csrfToken";
pub const DEFAULT_EMULATOR_URL: &str = "http://localhost:9099";
pub const DEFAULT_ERROR_TOAST_MS: u64 = 4000;
pub const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const APPLE_AUTHORIZE_URL: &str = "https://appleid.apple.com/auth/authorize";
pub const DEV_CLIENT_ID: &str = "fake-client-id";

/// Authorization endpoint and client registration for one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoint {
    pub authorize_url: String,
    pub client_id: String,
    pub scope: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Prefix for `/api/...` paths; empty means same origin.
    pub api_base_url: String,
    /// Where providers send the browser back to. `None` means `<origin>/login`.
    pub redirect_uri: Option<String>,
    /// Name of the anti-forgery cookie.
    pub csrf_cookie: String,
    /// Whether to `POST /api/auth/csrf` before reading the cookie.
    pub request_csrf_cookie: bool,
    /// Local auth emulator base URL (development only).
    pub emulator_url: Option<String>,
    pub google: Option<ProviderEndpoint>,
    pub apple: Option<ProviderEndpoint>,
    /// How long the sign-in error notification stays up.
    pub error_toast_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AuthConfig {
    /// Build config from variables captured when the bundle was compiled.
    ///
    /// - `AUTH_API_BASE_URL`: backend prefix (default same origin)
    /// - `AUTH_REDIRECT_URI`: provider return URL (default `<origin>/login`)
    /// - `AUTH_CSRF_COOKIE`: anti-forgery cookie name (default `csrfToken`)
    /// - `AUTH_REQUEST_CSRF`: prime the cookie first (default true)
    /// - `APP_ENV`: `development` routes providers through the emulator
    /// - `AUTH_EMULATOR_URL`: emulator base URL
    /// - `GOOGLE_CLIENT_ID`, `GOOGLE_AUTHORIZE_URL`
    /// - `APPLE_CLIENT_ID`, `APPLE_AUTHORIZE_URL`
    /// - `AUTH_ERROR_TOAST_MS`: notification lifetime (default 4000)
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::from_lookup(build_env)
    }

    /// Build config from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let dev = is_dev_environment(get("APP_ENV").as_deref());

        let emulator_url = get("AUTH_EMULATOR_URL")
            .or_else(|| dev.then(|| DEFAULT_EMULATOR_URL.to_owned()))
            .map(|url| url.trim_end_matches('/').to_owned());

        let provider = |id_key: &str, url_key: &str, default_url: &str, scope: &str| -> Option<ProviderEndpoint> {
            let client_id = get(id_key).or_else(|| dev.then(|| DEV_CLIENT_ID.to_owned()))?;
            Some(ProviderEndpoint {
                authorize_url: get(url_key).unwrap_or_else(|| default_url.to_owned()),
                client_id,
                scope: scope.to_owned(),
            })
        };

        Self {
            api_base_url: get("AUTH_API_BASE_URL").unwrap_or_default(),
            redirect_uri: get("AUTH_REDIRECT_URI"),
            csrf_cookie: get("AUTH_CSRF_COOKIE").unwrap_or_else(|| DEFAULT_CSRF_COOKIE.to_owned()),
            request_csrf_cookie: get("AUTH_REQUEST_CSRF")
                .and_then(|raw| env_bool(&raw))
                .unwrap_or(true),
            emulator_url,
            google: provider("GOOGLE_CLIENT_ID", "GOOGLE_AUTHORIZE_URL", GOOGLE_AUTHORIZE_URL, "openid email profile"),
            // Apple rejects scopes when the response is delivered in the fragment.
            apple: provider("APPLE_CLIENT_ID", "APPLE_AUTHORIZE_URL", APPLE_AUTHORIZE_URL, ""),
            error_toast_ms: get("AUTH_ERROR_TOAST_MS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(DEFAULT_ERROR_TOAST_MS),
        }
    }

    /// Endpoint for `provider`, if it is configured.
    #[must_use]
    pub fn endpoint(&self, provider: ProviderId) -> Option<&ProviderEndpoint> {
        match provider {
            ProviderId::Google => self.google.as_ref(),
            ProviderId::Apple => self.apple.as_ref(),
        }
    }
}

pub(crate) fn env_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub(crate) fn is_dev_environment(app_env: Option<&str>) -> bool {
    app_env.is_some_and(|env| env.eq_ignore_ascii_case("development"))
}

fn build_env(key: &str) -> Option<String> {
    let value = match key {
        "AUTH_API_BASE_URL" => option_env!("AUTH_API_BASE_URL"),
        "AUTH_REDIRECT_URI" => option_env!("AUTH_REDIRECT_URI"),
        "AUTH_CSRF_COOKIE" => option_env!("AUTH_CSRF_COOKIE"),
        "AUTH_REQUEST_CSRF" => option_env!("AUTH_REQUEST_CSRF"),
        "APP_ENV" => option_env!("APP_ENV"),
        "AUTH_EMULATOR_URL" => option_env!("AUTH_EMULATOR_URL"),
        "GOOGLE_CLIENT_ID" => option_env!("GOOGLE_CLIENT_ID"),
        "GOOGLE_AUTHORIZE_URL" => option_env!("GOOGLE_AUTHORIZE_URL"),
        "APPLE_CLIENT_ID" => option_env!("APPLE_CLIENT_ID"),
        "APPLE_AUTHORIZE_URL" => option_env!("APPLE_AUTHORIZE_URL"),
        "AUTH_ERROR_TOAST_MS" => option_env!("AUTH_ERROR_TOAST_MS"),
        _ => None,
    };
    value.map(str::to_owned)
}
