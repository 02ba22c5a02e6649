//! Redirect guard for protected routes.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected pages call [`install_route_guard`] with the login path. While the
//! handshake is loading nothing happens. Once it settles without a user (or
//! with an error) the guard navigates away exactly once per transition into
//! that condition, and never while already on the redirect path.

#[cfg(test)]
#[path = "route_guard_test.rs"]
mod route_guard_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_location;

use crate::state::session::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Session still loading.
    Pending,
    /// Signed in without error.
    Allowed,
    /// Caller should navigate to the redirect path now.
    Redirect,
    /// Not allowed, and a redirect was already issued or is not needed.
    Denied,
}

/// Per-route guard memory.
#[derive(Clone, Debug)]
pub struct RouteGuard {
    redirect_to: String,
    redirected: bool,
}

impl RouteGuard {
    #[must_use]
    pub fn new(redirect_to: impl Into<String>) -> Self {
        Self { redirect_to: redirect_to.into(), redirected: false }
    }

    #[must_use]
    pub fn redirect_to(&self) -> &str {
        &self.redirect_to
    }

    /// Decide what to do for `session` while the router is at `current_path`.
    pub fn evaluate(&mut self, session: &Session, current_path: &str) -> GuardOutcome {
        if session.is_loading() {
            return GuardOutcome::Pending;
        }
        if session.user().is_some() && session.error().is_none() {
            self.redirected = false;
            return GuardOutcome::Allowed;
        }
        if self.redirected || current_path == self.redirect_to {
            return GuardOutcome::Denied;
        }
        self.redirected = true;
        GuardOutcome::Redirect
    }
}

/// Navigate to `redirect_to` whenever `session` settles without a usable user.
pub fn install_route_guard<F>(session: ReadSignal<Session>, redirect_to: &str, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    let location = use_location();
    let mut guard = RouteGuard::new(redirect_to);
    Effect::new(move || {
        let path = location.pathname.get();
        let outcome = session.with(|current| guard.evaluate(current, &path));
        if outcome == GuardOutcome::Redirect {
            navigate(guard.redirect_to(), NavigateOptions::default());
        }
    });
}
