use contracts::domain::a001_transformer::Transformer;
use contracts::shared::form_schema::FormMode;
use contracts::system::permissions::Permission;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::details::TransformerDetails;
use crate::domain::a001_transformer::api;
use crate::system::auth::context::use_permission;

/// Inventory order: most important first, then by serial
fn sort_inventory(items: &mut [Transformer]) {
    items.sort_by(|a, b| {
        a.importance
            .cmp(&b.importance)
            .then_with(|| a.egat_sn.cmp(&b.egat_sn))
    });
}

#[component]
pub fn TransformerList() -> impl IntoView {
    let items: RwSignal<Vec<Transformer>> = RwSignal::new(Vec::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    // (transformer, mode) of the open form
    let open_form: RwSignal<Option<(Option<Transformer>, FormMode)>> = RwSignal::new(None);

    let can_manage = use_permission(Permission::ManageTransformers);
    let can_edit = use_permission(Permission::EditRecords);
    let can_delete = use_permission(Permission::DeleteRecords);

    let load_data = move || {
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::fetch_all().await {
                Ok(mut data) => {
                    sort_inventory(&mut data);
                    items.set(data);
                }
                Err(e) => set_error.set(Some(format!("ไม่สามารถโหลดทะเบียนหม้อแปลง: {}", e))),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| load_data());

    let delete_item = move |t: Transformer| {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message(&format!("ลบหม้อแปลง {} ({})?", t.name, t.egat_sn)).ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        spawn_local(async move {
            match api::delete_by_id(&t.id).await {
                Ok(()) => load_data(),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"ทะเบียนหม้อแปลงไฟฟ้า"</h1>
                    <Badge>{move || items.with(|v| v.len()).to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <Show when=move || can_manage.get()>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=move |_| open_form.set(Some((None, FormMode::Create)))
                        >
                            "+ เพิ่มหม้อแปลง"
                        </Button>
                    </Show>
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

                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell>"EGAT S/N"</TableHeaderCell>
                            <TableHeaderCell>"ชื่อหม้อแปลง"</TableHeaderCell>
                            <TableHeaderCell>"สถานีไฟฟ้า"</TableHeaderCell>
                            <TableHeaderCell>"ผู้ผลิต"</TableHeaderCell>
                            <TableHeaderCell>"MVA"</TableHeaderCell>
                            <TableHeaderCell>"kV"</TableHeaderCell>
                            <TableHeaderCell>"ความสำคัญ"</TableHeaderCell>
                            <TableHeaderCell>""</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || items.get()
                            key=|t| (t.id.clone(), t.metadata.version)
                            children=move |t: Transformer| {
                                let for_view = t.clone();
                                let for_edit = t.clone();
                                let for_delete = t.clone();
                                let mva = t.rated_mva.map(|v| v.to_string()).unwrap_or_else(|| "-".into());
                                view! {
                                    <TableRow>
                                        <TableCell><TableCellLayout>{t.egat_sn.clone()}</TableCellLayout></TableCell>
                                        <TableCell>
                                            <TableCellLayout>
                                                <a href="#" on:click=move |ev| {
                                                    ev.prevent_default();
                                                    open_form.set(Some((Some(for_view.clone()), FormMode::View)));
                                                }>{t.name.clone()}</a>
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell><TableCellLayout truncate=true>{t.substation.clone()}</TableCellLayout></TableCell>
                                        <TableCell><TableCellLayout truncate=true>{t.manufacturer.clone()}</TableCellLayout></TableCell>
                                        <TableCell><TableCellLayout>{mva}</TableCellLayout></TableCell>
                                        <TableCell><TableCellLayout>{t.voltage_kv.clone()}</TableCellLayout></TableCell>
                                        <TableCell><TableCellLayout>{t.importance.label()}</TableCellLayout></TableCell>
                                        <TableCell>
                                            <Show when=move || can_manage.get() && can_edit.get()>
                                                <Button
                                                    appearance=ButtonAppearance::Subtle
                                                    on_click={
                                                        let t = for_edit.clone();
                                                        move |_| open_form.set(Some((Some(t.clone()), FormMode::Edit)))
                                                    }
                                                >
                                                    "แก้ไข"
                                                </Button>
                                            </Show>
                                            <Show when=move || can_manage.get() && can_delete.get()>
                                                <Button
                                                    appearance=ButtonAppearance::Subtle
                                                    on_click={
                                                        let t = for_delete.clone();
                                                        move |_| delete_item(t.clone())
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

                {move || open_form.get().map(|(transformer, mode)| {
                    match transformer {
                        Some(t) => view! {
                            <TransformerDetails
                                transformer=t
                                mode=mode
                                on_close=move |_| open_form.set(None)
                                on_saved=move |_| {
                                    open_form.set(None);
                                    load_data();
                                }
                            />
                        }.into_any(),
                        None => view! {
                            <TransformerDetails
                                mode=mode
                                on_close=move |_| open_form.set(None)
                                on_saved=move |_| {
                                    open_form.set(None);
                                    load_data();
                                }
                            />
                        }.into_any(),
                    }
                })}
            </div>
        </div>
    }
}
