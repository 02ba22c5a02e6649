//! OIDC implicit-flow redirect adapter.
//!
//! DESIGN
//! ======
//! `begin_redirect` stores a [`PendingRedirect`] (provider, `state`, `nonce`)
//! and navigates to the provider's authorization endpoint asking for an
//! `id_token` in the URL fragment. When the provider sends the browser back,
//! `consume_redirect_result` matches the fragment against the pending record.
//! A page load without a pending record is an ordinary visit.
//!
//! In development the authorization request goes to the local auth emulator's
//! handler instead, with `providerId` naming the real provider.

#[cfg(test)]
#[path = "redirect_test.rs"]
mod redirect_test;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{IdentityError, IdentityProvider, ProviderCredential, ProviderId, RedirectOutcome};
use crate::config::{AuthConfig, ProviderEndpoint};

/// Path of the emulator's authorization handler, relative to its base URL.
pub const EMULATOR_HANDLER_PATH: &str = "/emulator/auth/handler";

/// Sign-in started on this tab and not yet completed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRedirect {
    pub provider: ProviderId,
    pub state: String,
    pub nonce: String,
}

impl PendingRedirect {
    /// Fresh record with random `state` and `nonce`.
    #[must_use]
    pub fn generate(provider: ProviderId) -> Self {
        Self {
            provider,
            state: Uuid::new_v4().simple().to_string(),
            nonce: Uuid::new_v4().simple().to_string(),
        }
    }
}

/// Persistence for the pending redirect across the provider round trip.
pub trait RedirectStore: Send + Sync {
    /// # Errors
    ///
    /// [`IdentityError::Browser`] when storage is unavailable.
    fn load(&self) -> Result<Option<String>, IdentityError>;

    /// # Errors
    ///
    /// [`IdentityError::Browser`] when storage is unavailable.
    fn save(&self, value: &str) -> Result<(), IdentityError>;

    /// # Errors
    ///
    /// [`IdentityError::Browser`] when storage is unavailable.
    fn clear(&self) -> Result<(), IdentityError>;
}

/// The parts of `window.location` the adapter touches.
pub trait BrowserLocation: Send + Sync {
    /// Full page navigation to `url`.
    ///
    /// # Errors
    ///
    /// [`IdentityError::Browser`] when navigation is refused.
    fn assign(&self, url: &str) -> Result<(), IdentityError>;

    /// Current URL fragment without the leading `#`, if any.
    fn fragment(&self) -> Option<String>;

    /// Drop the fragment from the address bar without reloading.
    ///
    /// # Errors
    ///
    /// [`IdentityError::Browser`] when history cannot be rewritten.
    fn clear_fragment(&self) -> Result<(), IdentityError>;

    /// Page origin (`https://example.com`), if known.
    fn origin(&self) -> Option<String>;
}

/// [`IdentityProvider`] speaking the OIDC implicit flow.
#[derive(Clone)]
pub struct OidcRedirectProvider {
    config: AuthConfig,
    store: Arc<dyn RedirectStore>,
    location: Arc<dyn BrowserLocation>,
}

impl OidcRedirectProvider {
    #[must_use]
    pub fn new(config: &AuthConfig, store: Arc<dyn RedirectStore>, location: Arc<dyn BrowserLocation>) -> Self {
        Self { config: config.clone(), store, location }
    }

    fn redirect_uri(&self) -> Result<String, IdentityError> {
        if let Some(uri) = &self.config.redirect_uri {
            return Ok(uri.clone());
        }
        self.location
            .origin()
            .map(|origin| format!("{origin}/login"))
            .ok_or_else(|| IdentityError::Browser("page origin unavailable".to_owned()))
    }

    fn load_pending(&self) -> Result<Option<PendingRedirect>, IdentityError> {
        let Some(raw) = self.store.load()? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(pending) => Ok(Some(pending)),
            Err(e) => {
                leptos::logging::warn!("discarding unreadable pending sign-in: {e}");
                self.store.clear()?;
                Ok(None)
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl IdentityProvider for OidcRedirectProvider {
    fn is_configured(&self, provider: ProviderId) -> bool {
        self.config.endpoint(provider).is_some()
    }

    async fn begin_redirect(&self, provider: ProviderId) -> Result<(), IdentityError> {
        let endpoint = self.config.endpoint(provider).ok_or(IdentityError::NotConfigured(provider))?;
        let redirect_uri = self.redirect_uri()?;
        let pending = PendingRedirect::generate(provider);
        let raw = serde_json::to_string(&pending).map_err(|e| IdentityError::Browser(e.to_string()))?;
        self.store.save(&raw)?;

        let url = authorize_url(endpoint, &redirect_uri, &pending, self.config.emulator_url.as_deref());
        leptos::logging::log!("redirecting to {provider} sign-in");
        self.location.assign(&url)
    }

    async fn consume_redirect_result(&self) -> Result<RedirectOutcome, IdentityError> {
        let params = self.location.fragment().map(|f| parse_fragment(&f)).unwrap_or_default();
        let param = |key: &str| params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str());
        let is_callback = param("id_token").is_some() || param("error").is_some();

        let Some(pending) = self.load_pending()? else {
            // Unsolicited callback: never leave a token in the address bar.
            if is_callback {
                self.location.clear_fragment()?;
            }
            return Ok(RedirectOutcome::NoRedirect);
        };

        // The user came back without finishing (back button, reload).
        if !is_callback {
            self.store.clear()?;
            return Ok(RedirectOutcome::NoRedirect);
        }

        self.store.clear()?;
        self.location.clear_fragment()?;

        if let Some(error) = param("error") {
            let message = match param("error_description") {
                Some(description) => format!("{error}: {description}"),
                None => error.to_owned(),
            };
            return Err(IdentityError::Provider(message));
        }
        if param("state") != Some(pending.state.as_str()) {
            return Err(IdentityError::StateMismatch);
        }
        let id_token = param("id_token").filter(|t| !t.is_empty()).ok_or(IdentityError::MissingIdToken)?;

        Ok(RedirectOutcome::Credential(ProviderCredential::new(pending.provider, id_token)))
    }

    async fn id_token(&self, credential: ProviderCredential) -> Result<String, IdentityError> {
        Ok(credential.into_id_token())
    }

    async fn sign_out_local(&self) -> Result<(), IdentityError> {
        self.store.clear()?;
        self.location.clear_fragment()
    }
}

/// Authorization request URL for `endpoint`.
pub(crate) fn authorize_url(
    endpoint: &ProviderEndpoint,
    redirect_uri: &str,
    pending: &PendingRedirect,
    emulator_url: Option<&str>,
) -> String {
    let base = match emulator_url {
        Some(emulator) => format!("{emulator}{EMULATOR_HANDLER_PATH}"),
        None => endpoint.authorize_url.clone(),
    };

    let mut params: Vec<(&str, &str)> = vec![
        ("client_id", endpoint.client_id.as_str()),
        ("redirect_uri", redirect_uri),
        ("response_type", "id_token"),
        ("response_mode", "fragment"),
    ];
    if !endpoint.scope.is_empty() {
        params.push(("scope", endpoint.scope.as_str()));
    }
    params.push(("state", pending.state.as_str()));
    params.push(("nonce", pending.nonce.as_str()));
    if emulator_url.is_some() {
        params.push(("providerId", pending.provider.as_str()));
    }

    let query = params
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}{query}")
}

/// Split a `key=value&...` fragment into decoded pairs.
pub(crate) fn parse_fragment(fragment: &str) -> Vec<(String, String)> {
    let decode = |raw: &str| {
        let spaced = raw.replace('+', " ");
        urlencoding::decode(&spaced).map_or_else(|_| spaced.clone(), std::borrow::Cow::into_owned)
    };

    fragment
        .trim_start_matches('#')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect()
}
