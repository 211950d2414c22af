use contracts::shared::form_schema::FieldErrors;
use contracts::system::permissions::{Permission, PermissionSet};
use contracts::system::users::{CreateUserDto, UpdateUserDto, User};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::system::users::api;

/// Checkbox label; flags kept only for their legacy position say so
fn permission_label(permission: Permission) -> String {
    if permission.is_enforced() {
        permission.label().to_string()
    } else {
        format!("{} (ไม่มีผลในระบบนี้)", permission.label())
    }
}

/// Create form when `user` is `None`, edit form otherwise.
/// The employee number of an existing user cannot be changed.
#[component]
pub fn UserForm(
    #[prop(optional)] user: Option<User>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] on_saved: Callback<()>,
) -> impl IntoView {
    let is_edit = user.is_some();
    let user_id = user.as_ref().map(|u| u.id.clone());

    let login = RwSignal::new(user.as_ref().map(|u| u.login.clone()).unwrap_or_default());
    let firstname = RwSignal::new(user.as_ref().map(|u| u.firstname.clone()).unwrap_or_default());
    let lastname = RwSignal::new(user.as_ref().map(|u| u.lastname.clone()).unwrap_or_default());
    let flags = user
        .as_ref()
        .map(|u| u.permissions.to_flags())
        .unwrap_or([false; Permission::COUNT])
        .map(RwSignal::new);

    let (error, set_error) = signal::<Option<String>>(None);
    let field_errors = RwSignal::new(FieldErrors::default());
    let (saving, set_saving) = signal(false);

    let field_error = move |key: &'static str| {
        move || field_errors.with(|e| e.get(key).map(str::to_string))
    };

    let on_save = move |_| {
        let permissions = PermissionSet::from_flags(flags.map(|f| f.get_untracked()));
        let firstname = firstname.get_untracked();
        let lastname = lastname.get_untracked();

        let validation = match &user_id {
            Some(id) => UpdateUserDto {
                id: id.clone(),
                firstname: firstname.clone(),
                lastname: lastname.clone(),
                permissions: permissions.clone(),
            }
            .validate(),
            None => CreateUserDto {
                login: login.get_untracked(),
                firstname: firstname.clone(),
                lastname: lastname.clone(),
                permissions: permissions.clone(),
            }
            .validate(),
        };
        if let Err(errors) = validation {
            field_errors.set(errors);
            return;
        }

        set_saving.set(true);
        set_error.set(None);
        field_errors.set(FieldErrors::default());

        let user_id = user_id.clone();
        spawn_local(async move {
            let result = match user_id {
                Some(id) => {
                    api::update_user(UpdateUserDto {
                        id,
                        firstname,
                        lastname,
                        permissions,
                    })
                    .await
                }
                None => {
                    api::create_user(CreateUserDto {
                        login: login.get_untracked().trim().to_string(),
                        firstname,
                        lastname,
                        permissions,
                    })
                    .await
                }
            };
            match result {
                Ok(saved) => {
                    log::info!("Saved user {}", saved.login);
                    on_saved.run(());
                }
                Err(e) => {
                    field_errors.set(FieldErrors::from(e.field_errors));
                    set_error.set(Some(e.message));
                    set_saving.set(false);
                }
            }
        });
    };

    let title = match &user {
        Some(u) => format!("แก้ไขผู้ใช้งาน: {}", u.login),
        None => "เพิ่มผู้ใช้งาน".to_string(),
    };

    view! {
        <div class="modal-overlay" on:click=move |_| on_close.run(())>
            <div class="modal" on:click=move |ev| ev.stop_propagation()>
                <div class="modal-header">
                    <h2 class="modal-title">{title}</h2>
                </div>

                <div class="modal-body">
                    {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                    <div class="form__group">
                        <Label>"รหัสพนักงาน *"</Label>
                        <Input
                            value=login
                            placeholder="8 หลัก"
                            disabled=Signal::derive(move || is_edit || saving.get())
                        />
                        {move || field_error("login")().map(|m| view! { <div class="form__error">{m}</div> })}
                    </div>

                    <div class="form__group">
                        <Label>"ชื่อ *"</Label>
                        <Input value=firstname disabled=Signal::derive(move || saving.get()) />
                        {move || field_error("firstname")().map(|m| view! { <div class="form__error">{m}</div> })}
                    </div>

                    <div class="form__group">
                        <Label>"นามสกุล *"</Label>
                        <Input value=lastname disabled=Signal::derive(move || saving.get()) />
                        {move || field_error("lastname")().map(|m| view! { <div class="form__error">{m}</div> })}
                    </div>

                    <div class="form__group">
                        <Label>"สิทธิ์การใช้งาน"</Label>
                        {Permission::ALL
                            .into_iter()
                            .map(|p| view! { <Checkbox checked=flags[p.position()] label=permission_label(p) /> })
                            .collect_view()}
                        {move || field_error("permissions")().map(|m| view! { <div class="form__error">{m}</div> })}
                    </div>
                </div>

                <div class="modal-footer">
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| on_close.run(())
                        disabled=Signal::derive(move || saving.get())
                    >
                        "ยกเลิก"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=on_save
                        disabled=Signal::derive(move || saving.get())
                    >
                        {move || if saving.get() { "กำลังบันทึก..." } else { "บันทึก" }}
                    </Button>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unenforced_permissions_are_marked() {
        assert_eq!(permission_label(Permission::ManageUsers), "จัดการผู้ใช้งาน");
        assert_eq!(
            permission_label(Permission::ExportReports),
            "ส่งออกรายงาน (ไม่มีผลในระบบนี้)"
        );
    }
}
