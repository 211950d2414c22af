//! Application shell: auth gate plus a plain navigation bar.
//!
//! The current page is a signal; there is no router and no URL state.

use contracts::system::permissions::Permission;
use leptos::prelude::*;

use crate::domain::a001_transformer::ui::list::TransformerList;
use crate::domain::a002_inspection_item::ui::list::InspectionList;
use crate::projections::p900_inspection_summary::ui::InspectionSummaryPage;
use crate::system::auth::context::{do_logout, use_auth, AuthState};
use crate::system::pages::login::LoginPage;
use crate::system::users::ui::list::UsersListPage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Inspections,
    Transformers,
    Summary,
    Users,
}

impl Page {
    pub const ALL: [Page; 4] = [
        Self::Inspections,
        Self::Transformers,
        Self::Summary,
        Self::Users,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Inspections => "ผลการตรวจสอบ",
            Self::Transformers => "ทะเบียนหม้อแปลง",
            Self::Summary => "ผลการคำนวณ",
            Self::Users => "ผู้ใช้งาน",
        }
    }

    /// Permission needed to see the page in the menu
    pub fn required_permission(&self) -> Option<Permission> {
        match self {
            Self::Inspections | Self::Transformers => None,
            Self::Summary => Some(Permission::ViewCalculations),
            Self::Users => Some(Permission::ManageUsers),
        }
    }

    pub fn is_visible_to(&self, auth: &AuthState) -> bool {
        self.required_permission().map_or(true, |p| auth.can(p))
    }
}

/// Main layout: navigation bar and the current page
#[component]
fn MainLayout() -> impl IntoView {
    let (auth_state, set_auth_state) = use_auth();
    let page = RwSignal::new(Page::default());

    let display_name = move || {
        auth_state.with(|s| {
            s.session
                .as_ref()
                .map(|s| format!("{} ({})", s.display_name, s.employee_no))
                .unwrap_or_default()
        })
    };

    view! {
        <div class="app">
            <nav class="app__nav">
                {Page::ALL
                    .into_iter()
                    .map(|p| view! {
                        <Show when=move || auth_state.with(|s| p.is_visible_to(s))>
                            <button
                                class=move || if page.get() == p { "nav__item nav__item--active" } else { "nav__item" }
                                on:click=move |_| page.set(p)
                            >
                                {p.title()}
                            </button>
                        </Show>
                    })
                    .collect_view()}
                <div class="app__user">
                    <span>{display_name}</span>
                    <button class="btn-secondary" on:click=move |_| do_logout(set_auth_state)>
                        "ออกจากระบบ"
                    </button>
                </div>
            </nav>

            <main class="app__content">
                {move || match page.get() {
                    Page::Inspections => view! { <InspectionList /> }.into_any(),
                    Page::Transformers => view! { <TransformerList /> }.into_any(),
                    Page::Summary => view! { <InspectionSummaryPage /> }.into_any(),
                    Page::Users => view! { <UsersListPage /> }.into_any(),
                }}
            </main>
        </div>
    }
}

/// Application shell - auth gate component.
///
/// Shows `LoginPage` until a session exists, `MainLayout` afterwards.
#[component]
pub fn AppShell() -> impl IntoView {
    let (auth_state, _) = use_auth();

    view! {
        <Show
            when=move || !auth_state.with(|s| s.restoring)
            fallback=|| view! { <div class="app__loading">"กำลังโหลด..."</div> }
        >
            <Show
                when=move || auth_state.with(|s| s.is_authenticated())
                fallback=|| view! { <LoginPage /> }
            >
                <MainLayout />
            </Show>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::system::auth::SessionInfo;
    use contracts::system::permissions::PermissionSet;

    #[test]
    fn test_menu_follows_permissions() {
        let mut auth = AuthState {
            access_token: Some("t".into()),
            session: Some(SessionInfo {
                user_id: "u".into(),
                employee_no: "12345678".into(),
                display_name: "x".into(),
                permissions: PermissionSet::empty(),
                expires_at: String::new(),
            }),
            restoring: false,
        };
        let visible = |auth: &AuthState| {
            Page::ALL
                .into_iter()
                .filter(|p| p.is_visible_to(auth))
                .collect::<Vec<_>>()
        };
        assert_eq!(visible(&auth), [Page::Inspections, Page::Transformers]);

        if let Some(session) = auth.session.as_mut() {
            session.permissions = PermissionSet::all();
        }
        assert_eq!(visible(&auth), Page::ALL);
    }
}
