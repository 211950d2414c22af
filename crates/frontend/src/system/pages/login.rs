use contracts::system::auth::{normalize_employee_no, LoginError};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::system::auth::{api, context, storage};

#[component]
pub fn LoginPage() -> impl IntoView {
    let (employee_no, set_employee_no) =
        signal(storage::get_employee_no().unwrap_or_default());
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (is_loading, set_is_loading) = signal(false);

    let (_, set_auth_state) = context::use_auth();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if is_loading.get_untracked() {
            return;
        }

        // Blank input never reaches the server
        let value = employee_no.get_untracked();
        if let Err(LoginError::Required) = normalize_employee_no(&value) {
            set_error_message.set(Some(LoginError::Required.to_string()));
            return;
        }

        set_is_loading.set(true);
        set_error_message.set(None);

        spawn_local(async move {
            match api::login(value).await {
                Ok(response) => {
                    log::info!("Logged in as {}", response.session.employee_no);
                    context::complete_login(set_auth_state, response);
                }
                Err(e) => set_error_message.set(Some(e)),
            }
            set_is_loading.set(false);
        });
    };

    view! {
        <div class="login-container">
            <div class="login-box">
                <h1>"ระบบบันทึกผลการบำรุงรักษาหม้อแปลงไฟฟ้า"</h1>
                <h2>"เข้าสู่ระบบ"</h2>

                <Show when=move || error_message.get().is_some()>
                    <div class="error-message">
                        {move || error_message.get().unwrap_or_default()}
                    </div>
                </Show>

                <form on:submit=on_submit>
                    <div class="form-group">
                        <label for="employee_no">"รหัสพนักงาน"</label>
                        <input
                            type="text"
                            id="employee_no"
                            inputmode="numeric"
                            autocomplete="username"
                            placeholder="12345678"
                            prop:value=move || employee_no.get()
                            on:input=move |ev| set_employee_no.set(event_target_value(&ev))
                            disabled=move || is_loading.get()
                        />
                    </div>

                    <button
                        type="submit"
                        class="btn-primary"
                        disabled=move || is_loading.get()
                    >
                        {move || if is_loading.get() { "กำลังตรวจสอบ..." } else { "เข้าสู่ระบบ" }}
                    </button>
                </form>
            </div>
        </div>
    }
}
