use contracts::system::permissions::Permission;
use leptos::prelude::*;

use super::context::use_auth;

/// Renders `children` only for sessions holding `permission`,
/// a notice naming the missing permission otherwise.
///
/// The backend enforces the same check; this only keeps pages honest.
#[component]
pub fn RequirePermission(permission: Permission, children: ChildrenFn) -> impl IntoView {
    let (auth_state, _) = use_auth();
    let allowed = move || auth_state.with(|s| s.can(permission));

    view! {
        <Show
            when=allowed
            fallback=move || view! {
                <div class="alert alert--error">
                    {format!("ไม่มีสิทธิ์ใช้งาน: {}", permission.label())}
                </div>
            }
        >
            {children()}
        </Show>
    }
}
