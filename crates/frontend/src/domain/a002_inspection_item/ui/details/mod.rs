use contracts::domain::a002_inspection_item::{InspectionItem, InspectionItemDto};
use contracts::shared::form_schema::{Category, FieldErrors, FormMode, FormRecord};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a002_inspection_item::api;
use crate::shared::schema_form::SchemaForm;

/// Form of one inspection record in a modal: header fields followed by the
/// fields of `category`. A new record (`item` is `None`) starts from
/// `defaults`.
#[component]
pub fn InspectionDetails(
    category: &'static Category,
    #[prop(optional)] item: Option<InspectionItem>,
    #[prop(optional)] defaults: Option<FormRecord>,
    mode: FormMode,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] on_saved: Callback<()>,
) -> impl IntoView {
    let id = item.as_ref().map(|i| i.id);
    let initial = item.as_ref().map(InspectionItem::to_record).or(defaults);
    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);
    let server_errors = RwSignal::new(FieldErrors::default());

    let test_type = category.id.clone();
    let on_submit = move |record: FormRecord| {
        let dto = InspectionItemDto::from_record(id, &test_type, &record);
        set_saving.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::save(&dto).await {
                Ok(saved) => {
                    log::info!("Saved {} record {} for {}", saved.test_type, saved.id, saved.egat_sn);
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

    let title = match (&item, mode) {
        (None, _) => format!("บันทึกผล: {}", category.title),
        (Some(i), FormMode::View) => format!("{} #{}", category.title, i.id),
        (Some(i), _) => format!("แก้ไข {} #{}", category.title, i.id),
    };

    view! {
        <div class="modal-overlay" on:click=move |_| on_close.run(())>
            <div class="modal modal--wide" on:click=move |ev| ev.stop_propagation()>
                <div class="modal-header">
                    <h2 class="modal-title">{title}</h2>
                </div>
                <div class="modal-body">
                    {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                    <SchemaForm
                        category=InspectionItem::form_category(category)
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
