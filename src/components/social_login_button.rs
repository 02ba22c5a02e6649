//! Provider sign-in button.

use leptos::prelude::*;

use crate::identity::ProviderId;
use crate::state::context::use_auth_service;

/// Starts a redirect sign-in with `provider`. Disabled when no service is in
/// context or the provider has no client settings.
#[component]
pub fn SocialLoginButton(provider: ProviderId) -> impl IntoView {
    let service = use_auth_service();
    let available = service.as_ref().is_some_and(|s| s.is_configured(provider));
    let busy = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);

    let on_click = move |_| {
        if busy.get() {
            return;
        }
        let Some(service) = service.clone() else {
            return;
        };
        busy.set(true);
        error.set(None);

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            if let Err(e) = service.sign_in_with(provider).await {
                leptos::logging::warn!("{provider} sign-in did not start: {e}");
                error.set(Some(format!("Could not start {} sign-in.", provider.label())));
                busy.set(false);
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = service;
    };

    let class = format!("social-login social-login--{}", provider.label().to_ascii_lowercase());

    view! {
        <button
            class=class
            type="button"
            disabled=move || !available || busy.get()
            on:click=on_click
        >
            {format!("Sign in with {}", provider.label())}
        </button>
        <Show when=move || error.get().is_some()>
            <p class="social-login__error">{move || error.get().unwrap_or_default()}</p>
        </Show>
    }
}
