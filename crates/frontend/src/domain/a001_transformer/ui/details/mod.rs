use contracts::domain::a001_transformer::{Transformer, TransformerDto};
use contracts::shared::form_schema::{FieldErrors, FormMode, FormRecord};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a001_transformer::api;
use crate::shared::schema_form::SchemaForm;

/// Transformer form in a modal. `transformer` is `None` for a new one.
#[component]
pub fn TransformerDetails(
    #[prop(optional)] transformer: Option<Transformer>,
    mode: FormMode,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] on_saved: Callback<()>,
) -> impl IntoView {
    let id = transformer.as_ref().map(|t| t.id.clone());
    let initial = transformer.as_ref().map(Transformer::to_record);
    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);
    let server_errors = RwSignal::new(FieldErrors::default());

    let on_submit = move |record: FormRecord| {
        let dto = match TransformerDto::from_record(id.clone(), &record) {
            Ok(dto) => dto,
            Err(errors) => {
                server_errors.set(errors);
                return;
            }
        };
        set_saving.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::save(&dto).await {
                Ok(saved) => {
                    log::info!("Saved transformer {}", saved.egat_sn);
                    on_saved.run(());
                }
                Err(e) => {
                    server_errors.set(FieldErrors::from(e.field_errors));
                    set_error.set(Some(e.message));
                }
            }
            set_saving.set(false);
        });
    };

    let title = match (&transformer, mode) {
        (None, _) => "เพิ่มหม้อแปลงไฟฟ้า".to_string(),
        (Some(t), FormMode::View) => format!("หม้อแปลงไฟฟ้า {}", t.name),
        (Some(t), _) => format!("แก้ไขหม้อแปลงไฟฟ้า {}", t.name),
    };

    view! {
        <div class="modal-overlay" on:click=move |_| on_close.run(())>
            <div class="modal" on:click=move |ev| ev.stop_propagation()>
                <div class="modal-header">
                    <h2 class="modal-title">{title}</h2>
                </div>
                <div class="modal-body">
                    {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                    <SchemaForm
                        category=Transformer::form_category()
                        initial=initial.clone().unwrap_or_default()
                        mode=mode
                        on_submit=on_submit
                        on_cancel=on_close
                        server_errors=server_errors
                        saving=saving
                    />
                </div>
            </div>
        </div>
    }
}
