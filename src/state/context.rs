//! Context channels under the authentication boundary.
//!
//! Two independent channels: the read-only session value, and the
//! [`AuthService`] used to start sign-ins or sign out. Pages that only need
//! one do not subscribe to the other.

use leptos::prelude::*;

use super::session::Session;
use crate::auth::handshake::SessionSink;
use crate::auth::service::AuthService;

/// Read side of the boundary's session signal.
#[derive(Clone, Copy)]
pub struct SessionContext(pub ReadSignal<Session>);

/// Service handle shared with every page under the boundary.
#[derive(Clone)]
pub struct AuthServiceContext(pub AuthService);

pub fn provide_session_context(session: ReadSignal<Session>) {
    provide_context(SessionContext(session));
}

pub fn provide_auth_service(service: AuthService) {
    provide_context(AuthServiceContext(service));
}

/// Current session signal. Outside a boundary this is a constant `Loading`,
/// so guarded views wait rather than redirect.
#[must_use]
pub fn use_session() -> ReadSignal<Session> {
    use_context::<SessionContext>().map_or_else(|| signal(Session::Loading).0, |ctx| ctx.0)
}

#[must_use]
pub fn use_auth_service() -> Option<AuthService> {
    use_context::<AuthServiceContext>().map(|ctx| ctx.0)
}

impl SessionSink for WriteSignal<Session> {
    fn publish(&self, session: Session) {
        self.set(session);
    }
}
