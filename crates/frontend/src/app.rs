use crate::app_shell::AppShell;
use crate::system::auth::context::AuthProvider;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <AuthProvider>
            <AppShell />
        </AuthProvider>
    }
}
