mod state;

use contracts::system::permissions::Permission;
use contracts::system::users::User;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::shared::date_utils::format_timestamp;
use crate::system::auth::context::use_auth;
use crate::system::auth::guard::RequirePermission;
use crate::system::users::api;
use crate::system::users::ui::details::UserForm;
use state::{create_state, filter_users};

#[component]
pub fn UsersListPage() -> impl IntoView {
    view! {
        <RequirePermission permission=Permission::ManageUsers>
            <UsersList />
        </RequirePermission>
    }
}

#[component]
fn UsersList() -> impl IntoView {
    let state = create_state();
    let all_users: RwSignal<Vec<User>> = RwSignal::new(Vec::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    let (show_create_form, set_show_create_form) = signal(false);
    let editing_user: RwSignal<Option<User>> = RwSignal::new(None);

    let (auth_state, _) = use_auth();
    let own_id = move || auth_state.with(|s| s.session.as_ref().map(|s| s.user_id.clone()));

    let refresh_view = move || {
        let query = state.with_untracked(|s| s.search_query.clone());
        let items = all_users.with_untracked(|users| filter_users(users, &query));
        state.update(|s| s.items = items);
    };

    let load_data = move || {
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::fetch_users().await {
                Ok(data) => {
                    all_users.set(data);
                    state.update(|s| s.is_loaded = true);
                    refresh_view();
                }
                Err(e) => set_error.set(Some(format!("ไม่สามารถโหลดรายชื่อผู้ใช้งาน: {}", e))),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        if !state.with_untracked(|s| s.is_loaded) {
            load_data();
        }
    });

    let search_signal = RwSignal::new(String::new());
    let apply_search = move || {
        state.update(|s| s.search_query = search_signal.get_untracked());
        refresh_view();
    };

    let delete_user = move |user: User| {
        let confirmed = web_sys::window()
            .and_then(|w| {
                w.confirm_with_message(&format!("ลบผู้ใช้งาน {} ({})?", user.display_name(), user.login))
                    .ok()
            })
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        spawn_local(async move {
            match api::delete_user(&user.id).await {
                Ok(()) => load_data(),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"ผู้ใช้งาน"</h1>
                    <Badge>{move || state.with(|s| s.items.len()).to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| set_show_create_form.set(true)
                    >
                        "+ เพิ่มผู้ใช้งาน"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load_data()
                        disabled=Signal::derive(move || loading.get())
                    >
                        {move || if loading.get() { "กำลังโหลด..." } else { "รีเฟรช" }}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <Flex gap=FlexGap::Small align=FlexAlign::End>
                    <div style="flex: 1; max-width: 320px;">
                        <Input value=search_signal placeholder="รหัสพนักงานหรือชื่อ..." />
                    </div>
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| apply_search()>
                        "ค้นหา"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| {
                            search_signal.set(String::new());
                            apply_search();
                        }
                    >
                        "ล้าง"
                    </Button>
                </Flex>

                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell>"รหัสพนักงาน"</TableHeaderCell>
                            <TableHeaderCell>"ชื่อ-นามสกุล"</TableHeaderCell>
                            <TableHeaderCell>"สิทธิ์"</TableHeaderCell>
                            <TableHeaderCell>"เข้าสู่ระบบล่าสุด"</TableHeaderCell>
                            <TableHeaderCell>""</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || state.get().items
                            key=|u| (u.id.clone(), u.metadata.version)
                            children=move |user| {
                                let user_for_edit = user.clone();
                                let user_for_delete = user.clone();
                                let is_self = {
                                    let id = user.id.clone();
                                    move || own_id().as_deref() == Some(id.as_str())
                                };
                                let permissions = user
                                    .permissions
                                    .iter()
                                    .map(|p| p.label())
                                    .collect::<Vec<_>>()
                                    .join(", ");
                                let display_name = user.display_name();
                                view! {
                                    <TableRow>
                                        <TableCell>
                                            <TableCellLayout>
                                                <span style="font-weight: 500;">{user.login.clone()}</span>
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>{display_name}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>
                                                {if user.permissions.is_empty() { "-".to_string() } else { permissions }}
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{format_timestamp(user.last_login_at.as_ref())}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <Button
                                                appearance=ButtonAppearance::Subtle
                                                on_click=move |_| editing_user.set(Some(user_for_edit.clone()))
                                            >
                                                "แก้ไข"
                                            </Button>
                                            <Show when=move || !is_self()>
                                                <Button
                                                    appearance=ButtonAppearance::Subtle
                                                    on_click={
                                                        let user = user_for_delete.clone();
                                                        move |_| delete_user(user.clone())
                                                    }
                                                >
                                                    "ลบ"
                                                </Button>
                                            </Show>
                                        </TableCell>
                                    </TableRow>
                                }
                            }
                        />
                    </TableBody>
                </Table>

                <Show when=move || show_create_form.get()>
                    <UserForm
                        on_close=move |_| set_show_create_form.set(false)
                        on_saved=move |_| {
                            set_show_create_form.set(false);
                            load_data();
                        }
                    />
                </Show>

                {move || editing_user.get().map(|user| view! {
                    <UserForm
                        user=user
                        on_close=move |_| editing_user.set(None)
                        on_saved=move |_| {
                            editing_user.set(None);
                            load_data();
                        }
                    />
                })}
            </div>
        </div>
    }
}
