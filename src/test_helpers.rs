//! Shared test doubles for the transport, identity provider, cookies and
//! session sink.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::auth::handshake::{CancelFlag, SessionSink};
use crate::auth::service::AuthService;
use crate::identity::{IdentityError, IdentityProvider, ProviderCredential, ProviderId, RedirectOutcome};
use crate::net::error::TransportError;
use crate::net::http::{HttpRequest, HttpResponse, Method, SessionClient, Transport};
use crate::state::session::Session;
use crate::util::cookie::{CookieSource, parse_cookie};

// =============================================================================
// FakeTransport
// =============================================================================

type Reply = Result<HttpResponse, TransportError>;

/// Scripted transport keyed by `(method, path)`.
///
/// Each route replays its queued replies in order and repeats the last one.
/// Unrouted requests answer `404 no route`.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    requests: Mutex<Vec<HttpRequest>>,
    cancels: Mutex<Vec<(Method, String, CancelFlag)>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: Method, path: &str, status: u16, body: &str) {
        self.push(method, path, Ok(HttpResponse { status, body: body.to_owned() }));
    }

    pub fn fail(&self, method: Method, path: &str) {
        self.push(method, path, Err(TransportError("connection refused".to_owned())));
    }

    /// Trip `flag` while answering `(method, path)`, as an unmount would
    /// mid-request.
    pub fn cancel_during(&self, method: Method, path: &str, flag: CancelFlag) {
        self.cancels.lock().unwrap().push((method, path.to_owned(), flag));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: Method, path: &str) -> usize {
        self.requests().iter().filter(|r| r.method == method && r.url.ends_with(path)).count()
    }

    /// Paths requested so far, in order.
    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }

    fn push(&self, method: Method, path: &str, reply: Reply) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_owned()))
            .or_default()
            .push_back(reply);
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        for (method, path, flag) in self.cancels.lock().unwrap().iter() {
            if *method == request.method && request.url.ends_with(path.as_str()) {
                flag.cancel();
            }
        }
        let mut routes = self.routes.lock().unwrap();
        let path = routes.keys().find(|(m, p)| *m == request.method && request.url.ends_with(p.as_str())).cloned();
        let Some(key) = path else {
            return Ok(HttpResponse { status: 404, body: "no route".to_owned() });
        };
        let queue = routes.entry(key).or_default();
        if queue.len() > 1 {
            queue.pop_front().unwrap_or_else(|| Ok(HttpResponse { status: 404, body: String::new() }))
        } else {
            queue.front().cloned().unwrap_or_else(|| Ok(HttpResponse { status: 404, body: String::new() }))
        }
    }
}

// =============================================================================
// FakeIdentity
// =============================================================================

/// Scripted identity provider.
#[derive(Default)]
pub struct FakeIdentity {
    credential: Mutex<Option<(ProviderId, String)>>,
    redirect_error: Mutex<Option<IdentityError>>,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    begun: Mutex<Vec<ProviderId>>,
    local_sign_outs: Mutex<usize>,
    fail_local_sign_out: Mutex<bool>,
    unconfigured: Mutex<Vec<ProviderId>>,
}

impl FakeIdentity {
    /// No redirect pending.
    pub fn no_redirect() -> Self {
        Self::default()
    }

    /// A Google credential carrying `id_token`.
    pub fn with_credential(id_token: &str) -> Self {
        let identity = Self::default();
        *identity.credential.lock().unwrap() = Some((ProviderId::Google, id_token.to_owned()));
        identity
    }

    pub fn with_redirect_error(error: IdentityError) -> Self {
        let identity = Self::default();
        *identity.redirect_error.lock().unwrap() = Some(error);
        identity
    }

    /// Hold `consume_redirect_result` until the returned sender fires.
    pub fn gated(self) -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        *self.gate.lock().unwrap() = Some(rx);
        (self, tx)
    }

    pub fn failing_local_sign_out(self) -> Self {
        *self.fail_local_sign_out.lock().unwrap() = true;
        self
    }

    pub fn unconfigured(self, provider: ProviderId) -> Self {
        self.unconfigured.lock().unwrap().push(provider);
        self
    }

    pub fn begun(&self) -> Vec<ProviderId> {
        self.begun.lock().unwrap().clone()
    }

    pub fn local_sign_outs(&self) -> usize {
        *self.local_sign_outs.lock().unwrap()
    }
}

#[async_trait::async_trait(?Send)]
impl IdentityProvider for FakeIdentity {
    fn is_configured(&self, provider: ProviderId) -> bool {
        !self.unconfigured.lock().unwrap().contains(&provider)
    }

    async fn begin_redirect(&self, provider: ProviderId) -> Result<(), IdentityError> {
        if !self.is_configured(provider) {
            return Err(IdentityError::NotConfigured(provider));
        }
        self.begun.lock().unwrap().push(provider);
        Ok(())
    }

    async fn consume_redirect_result(&self) -> Result<RedirectOutcome, IdentityError> {
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if let Some(error) = self.redirect_error.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(match self.credential.lock().unwrap().take() {
            Some((provider, token)) => RedirectOutcome::Credential(ProviderCredential::new(provider, token)),
            None => RedirectOutcome::NoRedirect,
        })
    }

    async fn id_token(&self, credential: ProviderCredential) -> Result<String, IdentityError> {
        Ok(credential.into_id_token())
    }

    async fn sign_out_local(&self) -> Result<(), IdentityError> {
        *self.local_sign_outs.lock().unwrap() += 1;
        if *self.fail_local_sign_out.lock().unwrap() {
            return Err(IdentityError::Browser("storage blocked".to_owned()));
        }
        Ok(())
    }
}

// =============================================================================
// MemoryCookies / RecordingSink
// =============================================================================

/// `document.cookie` stand-in.
#[derive(Default)]
pub struct MemoryCookies(pub Mutex<String>);

impl MemoryCookies {
    pub fn new(raw: &str) -> Self {
        Self(Mutex::new(raw.to_owned()))
    }
}

impl CookieSource for MemoryCookies {
    fn get(&self, name: &str) -> Option<String> {
        parse_cookie(&self.0.lock().unwrap(), name)
    }
}

/// Session sink recording every publish.
#[derive(Clone, Default)]
pub struct RecordingSink(pub Arc<Mutex<Vec<Session>>>);

impl RecordingSink {
    pub fn published(&self) -> Vec<Session> {
        self.0.lock().unwrap().clone()
    }
}

impl SessionSink for RecordingSink {
    fn publish(&self, session: Session) {
        self.0.lock().unwrap().push(session);
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Service over the given doubles with the cookie named `csrfToken`.
pub fn service(identity: &Arc<FakeIdentity>, transport: &Arc<FakeTransport>, cookies: &str) -> AuthService {
    AuthService::new(
        identity.clone(),
        SessionClient::new(transport.clone(), ""),
        Arc::new(MemoryCookies::new(cookies)),
    )
}

pub const ADA_JSON: &str = r#"{"uid":"u1","name":"Ada","email":"ada@example.com","admin":true}"#;
