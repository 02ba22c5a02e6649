use std::sync::Arc;

use super::*;
use crate::auth::service::{CSRF_PATH, LOGIN_PATH, ME_PATH};
use crate::identity::IdentityError;
use crate::net::http::Method;
use crate::test_helpers::{ADA_JSON, FakeIdentity, FakeTransport, RecordingSink, service};

struct Fixture {
    identity: Arc<FakeIdentity>,
    transport: Arc<FakeTransport>,
    sink: RecordingSink,
}

impl Fixture {
    fn new(identity: FakeIdentity) -> Self {
        Self { identity: Arc::new(identity), transport: Arc::new(FakeTransport::new()), sink: RecordingSink::default() }
    }

    fn handshake(&self, cookies: &str) -> RedirectHandshake<RecordingSink> {
        RedirectHandshake::new(service(&self.identity, &self.transport, cookies), self.sink.clone())
    }

    fn exchange_ok(&self) {
        self.transport.respond(Method::Post, CSRF_PATH, 200, r#"{"message":"ok"}"#);
        self.transport.respond(Method::Post, LOGIN_PATH, 201, r#"{"message":"Signed in","expiresIn":3600}"#);
    }
}

// =============================================================
// no redirect
// =============================================================

#[tokio::test]
async fn no_redirect_and_no_session_settles_anonymous() {
    let fx = Fixture::new(FakeIdentity::no_redirect());
    fx.transport.respond(Method::Get, ME_PATH, 401, r#"{"message":"Not signed in"}"#);

    let state = fx.handshake("").run().await;

    assert_eq!(state, HandshakeState::Done);
    assert_eq!(fx.sink.published(), vec![Session::Anonymous]);
    let published = serde_json::to_value(&fx.sink.published()[0]).unwrap();
    assert_eq!(published, serde_json::json!({"user": null, "error": null, "loading": false}));
    assert_eq!(fx.transport.calls_to(Method::Post, LOGIN_PATH), 0);
}

#[tokio::test]
async fn no_redirect_with_existing_session_signs_in() {
    let fx = Fixture::new(FakeIdentity::no_redirect());
    fx.transport.respond(Method::Get, ME_PATH, 200, ADA_JSON);

    let state = fx.handshake("").run().await;

    assert_eq!(state, HandshakeState::Done);
    let published = fx.sink.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].user().map(|u| u.uid.as_str()), Some("u1"));
}

#[tokio::test]
async fn server_error_on_session_fetch_surfaces_generic_error() {
    let fx = Fixture::new(FakeIdentity::no_redirect());
    fx.transport.respond(Method::Get, ME_PATH, 500, "stack trace with secrets");

    let state = fx.handshake("").run().await;

    assert_eq!(state, HandshakeState::Failed);
    assert_eq!(fx.sink.published(), vec![Session::Failed(SIGN_IN_FAILED_MESSAGE.to_owned())]);
}

#[tokio::test]
async fn transport_failure_on_session_fetch_surfaces_generic_error() {
    let fx = Fixture::new(FakeIdentity::no_redirect());
    fx.transport.fail(Method::Get, ME_PATH);

    assert_eq!(fx.handshake("").run().await, HandshakeState::Failed);
    assert_eq!(fx.sink.published()[0].error(), Some(SIGN_IN_FAILED_MESSAGE));
}

// =============================================================
// credential exchange
// =============================================================

#[tokio::test]
async fn credential_is_exchanged_before_session_fetch() {
    let fx = Fixture::new(FakeIdentity::with_credential("id-tok"));
    fx.exchange_ok();
    fx.transport.respond(Method::Get, ME_PATH, 200, ADA_JSON);

    let state = fx.handshake("csrfToken=c1").run().await;

    assert_eq!(state, HandshakeState::Done);
    assert_eq!(fx.transport.paths(), vec![CSRF_PATH, LOGIN_PATH, ME_PATH]);
    let login = &fx.transport.requests()[1];
    let body: serde_json::Value = serde_json::from_str(login.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, serde_json::json!({"idToken": "id-tok", "csrfToken": "c1"}));
    assert_eq!(fx.identity.local_sign_outs(), 1);
    assert!(fx.sink.published()[0].is_signed_in());
}

#[tokio::test]
async fn missing_csrf_cookie_fails_without_calling_login() {
    let fx = Fixture::new(FakeIdentity::with_credential("id-tok"));
    fx.exchange_ok();

    let state = fx.handshake("other=1").run().await;

    assert_eq!(state, HandshakeState::Failed);
    let published = fx.sink.published();
    assert_eq!(published.len(), 1);
    assert!(published[0].user().is_none());
    assert!(published[0].error().is_some());
    assert_eq!(fx.transport.calls_to(Method::Post, LOGIN_PATH), 0);
    assert_eq!(fx.transport.calls_to(Method::Get, ME_PATH), 0);
}

#[tokio::test]
async fn login_rejected_as_unauthenticated_settles_anonymous() {
    let fx = Fixture::new(FakeIdentity::with_credential("expired"));
    fx.transport.respond(Method::Post, CSRF_PATH, 200, "{}");
    fx.transport.respond(Method::Post, LOGIN_PATH, 401, r#"{"message":"Invalid ID token"}"#);

    let state = fx.handshake("csrfToken=c1").run().await;

    assert_eq!(state, HandshakeState::Done);
    assert_eq!(fx.sink.published(), vec![Session::Anonymous]);
    assert_eq!(fx.identity.local_sign_outs(), 0);
}

#[tokio::test]
async fn login_bad_request_surfaces_generic_error() {
    let fx = Fixture::new(FakeIdentity::with_credential("tok"));
    fx.transport.respond(Method::Post, CSRF_PATH, 200, "{}");
    fx.transport.respond(Method::Post, LOGIN_PATH, 400, r#"{"message":"Invalid CSRF"}"#);

    assert_eq!(fx.handshake("csrfToken=c1").run().await, HandshakeState::Failed);
    assert_eq!(fx.sink.published(), vec![Session::Failed(SIGN_IN_FAILED_MESSAGE.to_owned())]);
}

#[tokio::test]
async fn local_sign_out_failure_does_not_fail_handshake() {
    let fx = Fixture::new(FakeIdentity::with_credential("tok").failing_local_sign_out());
    fx.exchange_ok();
    fx.transport.respond(Method::Get, ME_PATH, 200, ADA_JSON);

    assert_eq!(fx.handshake("csrfToken=c1").run().await, HandshakeState::Done);
    assert_eq!(fx.identity.local_sign_outs(), 1);
    assert!(fx.sink.published()[0].is_signed_in());
}

#[tokio::test]
async fn provider_error_surfaces_generic_error() {
    let fx = Fixture::new(FakeIdentity::with_redirect_error(IdentityError::StateMismatch));

    assert_eq!(fx.handshake("").run().await, HandshakeState::Failed);
    assert!(fx.transport.requests().is_empty());
    assert_eq!(fx.sink.published()[0].error(), Some(SIGN_IN_FAILED_MESSAGE));
}

// =============================================================
// cancellation
// =============================================================

#[tokio::test]
async fn cancel_before_redirect_check_resolves_publishes_nothing() {
    let (identity, release) = FakeIdentity::with_credential("tok").gated();
    let fx = Fixture::new(identity);
    fx.exchange_ok();
    fx.transport.respond(Method::Get, ME_PATH, 200, ADA_JSON);

    let handshake = fx.handshake("csrfToken=c1");
    let cancel = handshake.cancel_flag();
    let mut run = Box::pin(handshake.run());

    assert!(futures::poll!(&mut run).is_pending());
    cancel.cancel();
    let _ = release.send(());

    assert_eq!(run.await, HandshakeState::Cancelled);
    assert!(fx.sink.published().is_empty());
    assert!(fx.transport.requests().is_empty());
}

#[tokio::test]
async fn cancel_during_login_skips_session_fetch_and_publish() {
    let fx = Fixture::new(FakeIdentity::with_credential("tok"));
    fx.exchange_ok();
    fx.transport.respond(Method::Get, ME_PATH, 200, ADA_JSON);

    let handshake = fx.handshake("csrfToken=c1");
    fx.transport.cancel_during(Method::Post, LOGIN_PATH, handshake.cancel_flag());

    assert_eq!(handshake.run().await, HandshakeState::Cancelled);
    assert!(fx.sink.published().is_empty());
    assert_eq!(fx.transport.paths(), vec![CSRF_PATH, LOGIN_PATH]);
    assert_eq!(fx.transport.calls_to(Method::Get, ME_PATH), 0);
    assert_eq!(fx.identity.local_sign_outs(), 0);
}

#[tokio::test]
async fn cancel_during_csrf_priming_skips_login() {
    let fx = Fixture::new(FakeIdentity::with_credential("tok"));
    fx.exchange_ok();

    let handshake = fx.handshake("csrfToken=c1");
    fx.transport.cancel_during(Method::Post, CSRF_PATH, handshake.cancel_flag());

    assert_eq!(handshake.run().await, HandshakeState::Cancelled);
    assert!(fx.sink.published().is_empty());
    assert_eq!(fx.transport.calls_to(Method::Post, LOGIN_PATH), 0);
}

#[tokio::test]
async fn cancel_before_start_does_nothing() {
    let fx = Fixture::new(FakeIdentity::no_redirect());
    let handshake = fx.handshake("");
    assert_eq!(handshake.state(), HandshakeState::Idle);
    handshake.cancel_flag().cancel();

    assert_eq!(handshake.run().await, HandshakeState::Cancelled);
    assert!(fx.sink.published().is_empty());
    assert!(fx.transport.requests().is_empty());
}

#[test]
fn cancel_flag_clones_share_state() {
    let flag = CancelFlag::default();
    let other = flag.clone();
    assert!(!other.is_cancelled());
    flag.cancel();
    assert!(other.is_cancelled());
}
