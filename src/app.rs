//! Root application component with routing and the authentication boundary.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Redirect, Route, Router, Routes},
};

use crate::auth::service::AuthService;
use crate::components::auth_provider::AuthProvider;
use crate::config::AuthConfig;
use crate::pages::{dashboard::DashboardPage, login::LoginPage};

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Every route renders under one [`AuthProvider`], so the handshake runs once
/// per full page load.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = AuthConfig::from_build_env();
    let service = AuthService::browser(&config);

    view! {
        <Title text="Portal"/>

        <Router>
            <AuthProvider service=service error_toast_ms=config.error_toast_ms>
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("dashboard") view=DashboardPage/>
                    <Route path=StaticSegment("") view=|| view! { <Redirect path="/dashboard"/> }/>
                </Routes>
            </AuthProvider>
        </Router>
    }
}
