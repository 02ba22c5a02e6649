//! Admin dashboard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected route: the session guard sends anonymous or failed sessions to
//! `/login`. Signed-in users without the admin claim see "Forbidden".

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::net::types::User;
use crate::state::context::{use_auth_service, use_session};
use crate::state::session::Session;
use crate::util::route_guard::install_route_guard;

pub const LOGIN_PATH: &str = "/login";

/// What the dashboard renders for a given session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum DashboardView {
    Loading,
    Forbidden,
    Admin(User),
}

pub(crate) fn dashboard_view(session: &Session) -> DashboardView {
    match session.user() {
        Some(user) if user.admin => DashboardView::Admin(user.clone()),
        Some(_) => DashboardView::Forbidden,
        // Anonymous and failed sessions are being redirected.
        None => DashboardView::Loading,
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = use_session();
    install_route_guard(session, LOGIN_PATH, use_navigate());

    move || match session.with(dashboard_view) {
        DashboardView::Loading => view! { <p>"Loading..."</p> }.into_any(),
        DashboardView::Forbidden => view! { <h1>"Forbidden"</h1> }.into_any(),
        DashboardView::Admin(user) => view! { <AdminDashboard user=user/> }.into_any(),
    }
}

#[component]
fn AdminDashboard(user: User) -> impl IntoView {
    let service = use_auth_service();
    let signing_out = RwSignal::new(false);

    let on_sign_out = move |_| {
        if signing_out.get() {
            return;
        }
        signing_out.set(true);
        let service = service.clone();

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            if let Some(service) = service {
                if let Err(e) = service.sign_out().await {
                    leptos::logging::warn!("sign-out failed: {e}");
                }
            }
            // Full navigation remounts the boundary with a fresh session.
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href(LOGIN_PATH);
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = service;
    };

    view! {
        <div class="dashboard">
            <h1>"Dashboard"</h1>
            <dl class="dashboard__user">
                <dt>"Name"</dt>
                <dd>{user.name}</dd>
                <dt>"Email"</dt>
                <dd>{user.email}</dd>
            </dl>
            <button class="dashboard__sign-out" disabled=move || signing_out.get() on:click=on_sign_out>
                "Sign out"
            </button>
        </div>
    }
}
