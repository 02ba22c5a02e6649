//! Sign-in operations against the identity provider and the session backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `AuthService` is the single entry point pages and the handshake use for
//! anything session related. It is provided through Leptos context, so every
//! collaborator is held behind an `Arc` and the service clones cheaply.
//!
//! ERROR HANDLING
//! ==============
//! Backend 401 on `GET /api/auth/me` is not an error here: it comes back as
//! [`SessionLookup::Anonymous`]. Everything else surfaces as [`AuthError`].

#[cfg(test)]
#[path = "service_test.rs"]
mod service_test;

use std::sync::Arc;

use super::error::AuthError;
use crate::config::AuthConfig;
use crate::identity::browser::{SessionStorageStore, WindowLocation};
use crate::identity::{IdentityProvider, OidcRedirectProvider, ProviderCredential, ProviderId, RedirectOutcome};
use crate::net::http::{GlooTransport, SessionClient};
use crate::net::types::{LoginRequest, LoginResponse, User};
use crate::util::cookie::{CookieSource, DocumentCookies};

pub const CSRF_PATH: &str = "/api/auth/csrf";
pub const LOGIN_PATH: &str = "/api/auth/login";
pub const LOGOUT_PATH: &str = "/api/auth/logout";
pub const ME_PATH: &str = "/api/auth/me";

/// Result of asking the backend who is signed in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionLookup {
    SignedIn(User),
    Anonymous,
}

#[derive(Clone)]
pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    http: SessionClient,
    cookies: Arc<dyn CookieSource>,
    csrf_cookie: String,
    request_csrf_cookie: bool,
}

impl AuthService {
    #[must_use]
    pub fn new(identity: Arc<dyn IdentityProvider>, http: SessionClient, cookies: Arc<dyn CookieSource>) -> Self {
        Self {
            identity,
            http,
            cookies,
            csrf_cookie: crate::config::DEFAULT_CSRF_COOKIE.to_owned(),
            request_csrf_cookie: true,
        }
    }

    /// Use `name` as the anti-forgery cookie, optionally priming it first.
    #[must_use]
    pub fn with_csrf(mut self, name: impl Into<String>, request_first: bool) -> Self {
        self.csrf_cookie = name.into();
        self.request_csrf_cookie = request_first;
        self
    }

    /// Service wired to the real browser: `fetch`, session storage,
    /// `window.location` and `document.cookie`.
    #[must_use]
    pub fn browser(config: &AuthConfig) -> Self {
        let identity = OidcRedirectProvider::new(
            config,
            Arc::new(SessionStorageStore::default()),
            Arc::new(WindowLocation),
        );
        let http = SessionClient::new(Arc::new(GlooTransport), config.api_base_url.clone());
        Self::new(Arc::new(identity), http, Arc::new(DocumentCookies))
            .with_csrf(config.csrf_cookie.clone(), config.request_csrf_cookie)
    }

    #[must_use]
    pub fn is_configured(&self, provider: ProviderId) -> bool {
        self.identity.is_configured(provider)
    }

    /// Start a provider sign-in. On success the page navigates away.
    ///
    /// # Errors
    ///
    /// See [`IdentityProvider::begin_redirect`].
    pub async fn sign_in_with(&self, provider: ProviderId) -> Result<(), AuthError> {
        self.identity.begin_redirect(provider).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`IdentityProvider::consume_redirect_result`].
    pub async fn consume_redirect_result(&self) -> Result<RedirectOutcome, AuthError> {
        Ok(self.identity.consume_redirect_result().await?)
    }

    /// # Errors
    ///
    /// See [`IdentityProvider::id_token`].
    pub async fn id_token(&self, credential: ProviderCredential) -> Result<String, AuthError> {
        Ok(self.identity.id_token(credential).await?)
    }

    /// Anti-forgery token for the login exchange.
    ///
    /// Asks the backend to (re)issue the cookie when configured to, then reads
    /// it.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidAuth`] when the cookie is absent or empty, or the
    /// priming request's error.
    pub async fn csrf_token(&self) -> Result<String, AuthError> {
        if self.request_csrf_cookie {
            let _: serde_json::Value = self.http.post_empty(CSRF_PATH, &[]).await?;
        }
        self.cookies
            .get(&self.csrf_cookie)
            .ok_or_else(|| AuthError::InvalidAuth("Missing CSRF Token Cookie".to_owned()))
    }

    /// Exchange a provider id token for a first-party session cookie.
    ///
    /// # Errors
    ///
    /// Backend and transport failures.
    pub async fn login(&self, id_token: &str, csrf_token: &str) -> Result<LoginResponse, AuthError> {
        let body = LoginRequest { id_token, csrf_token };
        let response: Option<LoginResponse> = self.http.post(LOGIN_PATH, &body, &[]).await?;
        Ok(response.unwrap_or_default())
    }

    /// # Errors
    ///
    /// See [`IdentityProvider::sign_out_local`].
    pub async fn sign_out_local(&self) -> Result<(), AuthError> {
        Ok(self.identity.sign_out_local().await?)
    }

    /// Who the backend thinks is signed in.
    ///
    /// # Errors
    ///
    /// Any failure other than 401.
    pub async fn current_user(&self) -> Result<SessionLookup, AuthError> {
        match self.http.get::<User>(ME_PATH, &[]).await {
            Ok(user) => Ok(SessionLookup::SignedIn(user)),
            Err(e) if e.is_unauthenticated() => Ok(SessionLookup::Anonymous),
            Err(e) => Err(e.into()),
        }
    }

    /// End the backend session. Already signed out counts as success.
    ///
    /// # Errors
    ///
    /// Backend and transport failures other than 401.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        match self.http.post_empty::<serde_json::Value>(LOGOUT_PATH, &[]).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_unauthenticated() => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
