//! Generic form rendered from a [`Category`]
//!
//! All values live in one [`FormState`] signal and are changed through its
//! keyed `set`. Gated fields appear and disappear with their parent value;
//! what was typed into a hidden field is kept in the draft.

use contracts::shared::form_schema::{
    Category, Field, FieldErrors, FieldKind, FormError, FormMode, FormRecord, FormState,
    OTHER_OPTION,
};
use leptos::prelude::*;

/// Display text of a select option
pub fn option_label(option: &str) -> &str {
    if option == OTHER_OPTION {
        "อื่น ๆ"
    } else {
        option
    }
}

/// Message shown under a field: the local validation error first, then the
/// one reported by the server
fn field_message(form: &FormState, server: Option<&FieldErrors>, name: &str) -> Option<String> {
    form.errors()
        .get(name)
        .or_else(|| server.and_then(|e| e.get(name)))
        .map(str::to_string)
}

#[component]
pub fn SchemaForm(
    category: Category,
    /// Values to start from (edit and view)
    #[prop(optional)]
    initial: Option<FormRecord>,
    #[prop(optional)] mode: FormMode,
    /// Called once per successful submission with the validated record
    #[prop(into)]
    on_submit: Callback<FormRecord>,
    #[prop(into)] on_cancel: Callback<()>,
    /// Field errors returned by the backend; a field's entry is dropped
    /// as soon as that field is edited
    #[prop(optional)]
    server_errors: Option<RwSignal<FieldErrors>>,
    #[prop(optional)] saving: Option<ReadSignal<bool>>,
) -> impl IntoView {
    let form = RwSignal::new(match &initial {
        Some(record) => FormState::with_record(category, mode, record),
        None => FormState::new(category, mode),
    });

    let read_only = mode == FormMode::View;
    let is_saving = move || saving.is_some_and(|s| s.get());
    let disabled = move || read_only || is_saving();

    let set_value = move |name: String, value: String| {
        let result = form.try_update(|f| f.set(&name, value));
        if let Some(Err(e)) = result {
            log::warn!("Field update rejected: {}", e);
        }
        if let Some(server) = server_errors {
            server.update(|errors| errors.remove(&name));
        }
    };

    let on_form_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if read_only || is_saving() {
            return;
        }
        match form.try_update(|f| f.submit()) {
            Some(Ok(record)) => on_submit.run(record),
            Some(Err(FormError::Invalid(errors))) => {
                log::debug!("Form has {} invalid field(s)", errors.len());
            }
            Some(Err(e)) => log::warn!("Submit rejected: {}", e),
            None => {}
        }
    };

    let visible = move || {
        form.with(|f| {
            f.visible_fields()
                .into_iter()
                .cloned()
                .collect::<Vec<Field>>()
        })
    };

    view! {
        <form class="schema-form" on:submit=on_form_submit>
            <For
                each=visible
                key=|field| field.name.clone()
                children=move |field: Field| {
                    let name = field.name.clone();
                    let value = {
                        let name = name.clone();
                        move || form.with(|f| f.draft().value_of(&name))
                    };
                    let message = {
                        let name = name.clone();
                        move || {
                            let server = server_errors.map(|s| s.get());
                            form.with(|f| field_message(f, server.as_ref(), &name))
                        }
                    };
                    let input = render_input(&field, value, set_value, disabled);
                    let group_class = if field.is_gated() {
                        "form__group form__group--gated"
                    } else {
                        "form__group"
                    };

                    view! {
                        <div class=group_class>
                            <label class="form__label">
                                {field.name.clone()}
                                {field.rules.required.then_some(view! { <span class="form__required">" *"</span> })}
                            </label>
                            {input}
                            {move || message().map(|m| view! { <div class="form__error">{m}</div> })}
                        </div>
                    }
                }
            />

            <div class="form-actions">
                <button
                    type="button"
                    class="btn-secondary"
                    on:click=move |_| on_cancel.run(())
                    disabled=is_saving
                >
                    {if read_only { "ปิด" } else { "ยกเลิก" }}
                </button>
                {(!read_only).then(|| view! {
                    <button type="submit" class="btn-primary" disabled=is_saving>
                        {move || if is_saving() { "กำลังบันทึก..." } else { "บันทึก" }}
                    </button>
                })}
            </div>
        </form>
    }
}

fn render_input<V, S, D>(field: &Field, value: V, set_value: S, disabled: D) -> AnyView
where
    V: Fn() -> String + Clone + Send + Sync + 'static,
    S: Fn(String, String) + Copy + Send + Sync + 'static,
    D: Fn() -> bool + Copy + Send + Sync + 'static,
{
    let name = field.name.clone();
    match field.kind {
        FieldKind::Select => {
            let options = field
                .options
                .iter()
                .map(|option| {
                    let option = option.clone();
                    let current = value.clone();
                    let is_selected = {
                        let option = option.clone();
                        move || current() == option
                    };
                    view! {
                        <option value=option.clone() selected=is_selected>
                            {option_label(&option).to_string()}
                        </option>
                    }
                })
                .collect_view();
            let current = value.clone();
            view! {
                <select
                    class="form__input"
                    on:change=move |ev| set_value(name.clone(), event_target_value(&ev))
                    disabled=disabled
                >
                    <option value="" selected=move || current().is_empty()>"-- เลือก --"</option>
                    {options}
                </select>
            }
            .into_any()
        }
        FieldKind::Text | FieldKind::Date => {
            let input_type = field.kind.input_type().unwrap_or("text");
            let max_length = field.rules.max_length.map(|m| m.to_string());
            view! {
                <input
                    class="form__input"
                    type=input_type
                    maxlength=max_length
                    prop:value=value
                    on:input=move |ev| set_value(name.clone(), event_target_value(&ev))
                    disabled=disabled
                />
            }
            .into_any()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_label() {
        assert_eq!(option_label(OTHER_OPTION), "อื่น ๆ");
        assert_eq!(option_label("ปกติ"), "ปกติ");
    }

    #[test]
    fn test_local_error_wins_over_server_error() {
        let category = Category::new("c", "c", vec![Field::text("ชื่อ").required()]);
        let mut form = FormState::new(category, FormMode::Create);
        let mut server = FieldErrors::default();
        server.insert("ชื่อ", "ซ้ำ");

        assert_eq!(field_message(&form, Some(&server), "ชื่อ").as_deref(), Some("ซ้ำ"));

        assert!(form.submit().is_err());
        let local = form.errors().get("ชื่อ").map(str::to_string);
        assert_eq!(field_message(&form, Some(&server), "ชื่อ"), local);
        assert_eq!(field_message(&form, None, "อื่น"), None);
    }
}
