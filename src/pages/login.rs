//! Login page with provider sign-in buttons.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::components::social_login_button::SocialLoginButton;
use crate::identity::ProviderId;
use crate::state::context::use_session;
use crate::state::session::Session;

pub const AFTER_LOGIN_PATH: &str = "/dashboard";

/// Where a session on the login page should be sent, if anywhere.
pub(crate) fn login_redirect_target(session: &Session) -> Option<&'static str> {
    session.is_signed_in().then_some(AFTER_LOGIN_PATH)
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();
    let navigate = use_navigate();

    Effect::new(move || {
        if let Some(target) = session.with(login_redirect_target) {
            navigate(target, NavigateOptions::default());
        }
    });

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Login"</h1>
                <Show
                    when=move || session.with(Session::is_signed_in)
                    fallback=|| {
                        view! {
                            <div class="login-card__providers">
                                {ProviderId::ALL
                                    .into_iter()
                                    .map(|provider| view! { <SocialLoginButton provider=provider/> })
                                    .collect_view()}
                            </div>
                        }
                    }
                >
                    <p>"Logging in..."</p>
                </Show>
            </div>
        </div>
    }
}
