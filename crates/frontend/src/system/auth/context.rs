use contracts::system::auth::{LoginResponse, SessionInfo};
use contracts::system::permissions::Permission;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{api, storage};

#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub session: Option<SessionInfo>,
    /// True until the stored token has been checked against the server
    pub restoring: bool,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.session.is_some()
    }

    pub fn can(&self, permission: Permission) -> bool {
        self.session.as_ref().is_some_and(|s| s.can(permission))
    }
}

/// Auth context provider component
#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    let stored_token = storage::get_access_token();
    let (auth_state, set_auth_state) = signal(AuthState {
        restoring: stored_token.is_some(),
        ..AuthState::default()
    });

    // Restore the session of a stored token on mount
    Effect::new(move |_| {
        let Some(access_token) = stored_token.clone() else {
            return;
        };
        spawn_local(async move {
            match api::get_current_session(&access_token).await {
                Ok(session) => {
                    set_auth_state.set(AuthState {
                        access_token: Some(access_token),
                        session: Some(session),
                        restoring: false,
                    });
                }
                Err(e) => {
                    log::info!("Stored session rejected: {}", e);
                    storage::clear_session();
                    set_auth_state.set(AuthState::default());
                }
            }
        });
    });

    provide_context(auth_state);
    provide_context(set_auth_state);

    children()
}

/// Hook to access auth state
pub fn use_auth() -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
    let auth_state =
        use_context::<ReadSignal<AuthState>>().expect("AuthProvider not found in component tree");
    let set_auth_state =
        use_context::<WriteSignal<AuthState>>().expect("AuthProvider not found in component tree");

    (auth_state, set_auth_state)
}

/// Derived check of a single permission of the signed-in user
pub fn use_permission(permission: Permission) -> Signal<bool> {
    let (auth_state, _) = use_auth();
    Signal::derive(move || auth_state.with(|s| s.can(permission)))
}

/// Store a successful login and switch the shell to the dashboard
pub fn complete_login(set_auth_state: WriteSignal<AuthState>, response: LoginResponse) {
    storage::save_session(&response.access_token, &response.session.employee_no);
    set_auth_state.set(AuthState {
        access_token: Some(response.access_token),
        session: Some(response.session),
        restoring: false,
    });
}

/// End the session locally and on the server
pub fn do_logout(set_auth_state: WriteSignal<AuthState>) {
    let token = storage::get_access_token();
    storage::clear_session();
    set_auth_state.set(AuthState::default());

    if let Some(token) = token {
        spawn_local(async move {
            if let Err(e) = api::logout(&token).await {
                log::warn!("Logout request failed: {}", e);
            }
        });
    }
}
