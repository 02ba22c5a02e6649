//! Redirect sign-in handshake.
//!
//! SYSTEM CONTEXT
//! ==============
//! Runs once per mount of the authentication boundary. It turns "the browser
//! may have just come back from a provider" into a settled [`Session`]:
//!
//! ```text
//! Idle -> Checking -> Exchanging -> FetchingUser -> Done
//!                  \-> NoRedirect --/             \-> Failed
//! ```
//!
//! Any state may end in `Cancelled` when the boundary unmounts.
//!
//! ERROR HANDLING
//! ==============
//! A 401 at any step settles as [`Session::Anonymous`]. Every other failure is
//! logged and settles as [`Session::Failed`] with a fixed user-facing message.
//! Nothing is retried.

#[cfg(test)]
#[path = "handshake_test.rs"]
mod handshake_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::logging::{error, log, warn};

use super::error::AuthError;
use super::service::{AuthService, SessionLookup};
use crate::identity::{ProviderCredential, RedirectOutcome};
use crate::state::session::{SIGN_IN_FAILED_MESSAGE, Session};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandshakeState {
    Idle,
    Checking,
    Exchanging,
    NoRedirect,
    FetchingUser,
    Done,
    Failed,
    Cancelled,
}

/// Shared cancellation switch. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Receiver of the settled session.
pub trait SessionSink {
    fn publish(&self, session: Session);
}

pub struct RedirectHandshake<S: SessionSink> {
    service: AuthService,
    sink: S,
    cancel: CancelFlag,
    state: HandshakeState,
}

impl<S: SessionSink> RedirectHandshake<S> {
    #[must_use]
    pub fn new(service: AuthService, sink: S) -> Self {
        Self { service, sink, cancel: CancelFlag::default(), state: HandshakeState::Idle }
    }

    /// Flag that stops this handshake. Hand it to the unmount hook.
    #[must_use]
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    #[must_use]
    pub fn state(&self) -> HandshakeState {
        self.state
    }

    /// Drive the handshake to a terminal state, publishing at most once.
    pub async fn run(mut self) -> HandshakeState {
        let Some(settled) = self.settle().await else {
            return self.cancelled();
        };
        if self.cancel.is_cancelled() {
            return self.cancelled();
        }
        let terminal = if settled.error().is_some() { HandshakeState::Failed } else { HandshakeState::Done };
        self.state = terminal;
        self.sink.publish(settled);
        terminal
    }

    /// Settled session, or `None` once cancelled.
    async fn settle(&mut self) -> Option<Session> {
        match self.steps().await {
            Ok(session) => Some(session),
            Err(StepError::Cancelled) => None,
            Err(StepError::Auth(e)) if e.is_unauthenticated() => {
                log!("sign-in handshake: no backend session");
                Some(Session::Anonymous)
            }
            Err(StepError::Auth(e)) => {
                error!("sign-in handshake failed in {:?}: {e}", self.state);
                Some(Session::Failed(SIGN_IN_FAILED_MESSAGE.to_owned()))
            }
        }
    }

    async fn steps(&mut self) -> Result<Session, StepError> {
        self.advance(HandshakeState::Checking)?;
        match self.service.consume_redirect_result().await? {
            RedirectOutcome::Credential(credential) => {
                self.advance(HandshakeState::Exchanging)?;
                self.exchange(credential).await?;
            }
            RedirectOutcome::NoRedirect => self.advance(HandshakeState::NoRedirect)?,
        }

        self.advance(HandshakeState::FetchingUser)?;
        let lookup = self.service.current_user().await?;
        self.check()?;
        Ok(match lookup {
            SessionLookup::SignedIn(user) => Session::SignedIn(user),
            SessionLookup::Anonymous => Session::Anonymous,
        })
    }

    async fn exchange(&mut self, credential: ProviderCredential) -> Result<(), StepError> {
        let provider = credential.provider();
        let id_token = self.service.id_token(credential).await?;
        self.check()?;
        let csrf_token = self.service.csrf_token().await?;
        self.check()?;
        self.service.login(&id_token, &csrf_token).await?;
        self.check()?;
        log!("sign-in handshake: {provider} credential exchanged");

        if let Err(e) = self.service.sign_out_local().await {
            warn!("local provider sign-out failed: {e}");
        }
        Ok(())
    }

    fn advance(&mut self, next: HandshakeState) -> Result<(), StepError> {
        self.check()?;
        log!("sign-in handshake: {:?} -> {next:?}", self.state);
        self.state = next;
        Ok(())
    }

    fn check(&self) -> Result<(), StepError> {
        if self.cancel.is_cancelled() { Err(StepError::Cancelled) } else { Ok(()) }
    }

    fn cancelled(mut self) -> HandshakeState {
        log!("sign-in handshake cancelled in {:?}", self.state);
        self.state = HandshakeState::Cancelled;
        self.state
    }
}

enum StepError {
    Cancelled,
    Auth(AuthError),
}

impl From<AuthError> for StepError {
    fn from(e: AuthError) -> Self {
        Self::Auth(e)
    }
}
