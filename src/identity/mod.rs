//! Identity provider adapter.
//!
//! SYSTEM CONTEXT
//! ==============
//! Third-party providers (Google, Apple) authenticate the user on their own
//! consent page and send the browser back here with an identity token. This
//! module hides that round trip behind [`IdentityProvider`] so the sign-in
//! handshake only sees "a credential arrived" or "this was a normal page load".


pub mod browser;
pub mod redirect;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use redirect::OidcRedirectProvider;

/// Supported third-party identity providers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderId {
    #[serde(rename = "google.com")]
    Google,
    #[serde(rename = "apple.com")]
    Apple,
}

impl ProviderId {
    pub const ALL: [Self; 2] = [Self::Google, Self::Apple];

    /// Provider identifier as used by the auth emulator (`google.com`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google.com",
            Self::Apple => "apple.com",
        }
    }

    /// Human label for buttons.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Apple => "Apple",
        }
    }

    /// Accepts `google`/`google.com` and `apple`/`apple.com`, case-insensitive.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "google" | "google.com" => Some(Self::Google),
            "apple" | "apple.com" => Some(Self::Apple),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity token handed back by a provider after a redirect.
///
/// Single-use: the token is moved out by [`ProviderCredential::into_id_token`].
#[derive(PartialEq, Eq)]
pub struct ProviderCredential {
    provider: ProviderId,
    id_token: String,
}

impl ProviderCredential {
    #[must_use]
    pub fn new(provider: ProviderId, id_token: impl Into<String>) -> Self {
        Self { provider, id_token: id_token.into() }
    }

    #[must_use]
    pub fn provider(&self) -> ProviderId {
        self.provider
    }

    #[must_use]
    pub fn into_id_token(self) -> String {
        self.id_token
    }
}

impl fmt::Debug for ProviderCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredential")
            .field("provider", &self.provider)
            .field("id_token", &"<redacted>")
            .finish()
    }
}

/// Result of checking the current page load for a provider callback.
#[derive(Debug, PartialEq, Eq)]
pub enum RedirectOutcome {
    Credential(ProviderCredential),
    /// Ordinary page load; nothing to exchange.
    NoRedirect,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("{0} sign-in is not configured")]
    NotConfigured(ProviderId),
    #[error("provider returned an error: {0}")]
    Provider(String),
    #[error("redirect state did not match the pending sign-in")]
    StateMismatch,
    #[error("redirect did not include an id_token")]
    MissingIdToken,
    #[error("browser api failure: {0}")]
    Browser(String),
}

/// Redirect-based identity provider.
///
/// Futures are not `Send`; implementations run on the browser event loop.
/// The trait is `Send + Sync` so services holding it can live in Leptos
/// context.
#[async_trait::async_trait(?Send)]
pub trait IdentityProvider: Send + Sync {
    /// Whether `provider` has enough settings to start a sign-in.
    fn is_configured(&self, provider: ProviderId) -> bool {
        let _ = provider;
        true
    }

    /// Navigate the browser to `provider`'s consent page.
    ///
    /// # Errors
    ///
    /// [`IdentityError::NotConfigured`] for a provider without client settings,
    /// [`IdentityError::Browser`] when navigation or storage fails.
    async fn begin_redirect(&self, provider: ProviderId) -> Result<(), IdentityError>;

    /// Inspect the current page load for a provider callback.
    ///
    /// # Errors
    ///
    /// Provider-reported failures and malformed callbacks.
    async fn consume_redirect_result(&self) -> Result<RedirectOutcome, IdentityError>;

    /// Extract the raw identity token, consuming the credential.
    ///
    /// # Errors
    ///
    /// Implementations that need to refresh the token may fail.
    async fn id_token(&self, credential: ProviderCredential) -> Result<String, IdentityError>;

    /// Forget provider-side state kept in the browser.
    ///
    /// # Errors
    ///
    /// [`IdentityError::Browser`] when storage cannot be cleared.
    async fn sign_out_local(&self) -> Result<(), IdentityError>;
}
