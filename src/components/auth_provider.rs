//! Authentication boundary component.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wraps the routed pages. On mount it creates a fresh `Loading` session,
//! provides it (read-only) and the [`AuthService`] through context, and runs
//! one redirect handshake in the background. Unmount cancels the handshake.
//! Sign-in failures show a dismissible notification that hides itself.

#[cfg(test)]
#[path = "auth_provider_test.rs"]
mod auth_provider_test;

use leptos::prelude::*;

use crate::auth::service::AuthService;
use crate::config::DEFAULT_ERROR_TOAST_MS;
use crate::state::context::{provide_auth_service, provide_session_context};
use crate::state::session::Session;

#[component]
pub fn AuthProvider(
    service: AuthService,
    #[prop(default = DEFAULT_ERROR_TOAST_MS)] error_toast_ms: u64,
    children: Children,
) -> impl IntoView {
    let (session, set_session) = signal(Session::Loading);
    provide_session_context(session);
    provide_auth_service(service.clone());

    #[cfg(feature = "hydrate")]
    {
        let handshake = crate::auth::handshake::RedirectHandshake::new(service, set_session);
        let cancel = handshake.cancel_flag();
        leptos::task::spawn_local(async move {
            let state = handshake.run().await;
            leptos::logging::log!("sign-in handshake finished: {state:?}");
        });
        on_cleanup(move || cancel.cancel());
    }
    #[cfg(not(feature = "hydrate"))]
    let _ = (service, set_session);

    let dismissed = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    Effect::new(move || {
        if session.with(|s| s.error().is_none()) {
            return;
        }
        leptos::task::spawn_local(async move {
            gloo_timers::future::sleep(std::time::Duration::from_millis(error_toast_ms)).await;
            dismissed.set(true);
        });
    });
    #[cfg(not(feature = "hydrate"))]
    let _ = error_toast_ms;

    let message = move || session.with(|s| toast_message(s, dismissed.get()));

    view! {
        <Show when=move || message().is_some()>
            <div class="auth-toast" role="alert">
                <span class="auth-toast__message">{move || message().unwrap_or_default()}</span>
                <button
                    class="auth-toast__close"
                    aria-label="Dismiss"
                    on:click=move |_| dismissed.set(true)
                >
                    "×"
                </button>
            </div>
        </Show>
        {children()}
    }
}

/// Notification text for `session`, unless the user dismissed it.
pub(crate) fn toast_message(session: &Session, dismissed: bool) -> Option<String> {
    if dismissed {
        return None;
    }
    session.error().map(str::to_owned)
}
