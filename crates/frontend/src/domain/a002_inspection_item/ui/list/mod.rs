use contracts::domain::a002_inspection_item::aggregate::header;
use contracts::domain::a002_inspection_item::{InspectionItem, InspectionQuery};
use contracts::domain::a003_inspection_category::{self as catalog, CategoryKind, CONDITION_FIELDS};
use contracts::shared::form_schema::{Category, FormMode, FormRecord};
use contracts::system::permissions::Permission;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::BTreeMap;
use thaw::*;

use super::details::InspectionDetails;
use crate::domain::a002_inspection_item::api;
use crate::shared::date_utils::format_date;
use crate::system::auth::context::{use_auth, AuthState};

/// Open record form: category, record (None for a new one), mode
type OpenForm = (&'static Category, Option<InspectionItem>, FormMode);

fn can_write(auth: &AuthState, test_type: &str) -> bool {
    CategoryKind::of(test_type).is_some_and(|kind| auth.can(kind.write_permission()))
}

/// Condition answer shown in the list: the first answered condition field
fn condition_of(item: &InspectionItem) -> String {
    CONDITION_FIELDS
        .iter()
        .find_map(|field| item.answer(field))
        .unwrap_or("-")
        .to_string()
}

/// Header values a new record starts with
fn new_record_defaults(auth: &AuthState, egat_sn: &str) -> FormRecord {
    let mut values = BTreeMap::new();
    values.insert(
        header::TEST_DATE.to_string(),
        chrono::Local::now().format("%Y-%m-%d").to_string(),
    );
    if let Some(session) = &auth.session {
        values.insert(header::INSPECTOR.to_string(), session.display_name.clone());
    }
    if !egat_sn.trim().is_empty() {
        values.insert(header::EGAT_SN.to_string(), egat_sn.trim().to_string());
    }
    FormRecord::from(values)
}

#[component]
pub fn InspectionList() -> impl IntoView {
    let items: RwSignal<Vec<InspectionItem>> = RwSignal::new(Vec::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    let open_form: RwSignal<Option<OpenForm>> = RwSignal::new(None);

    let filter_type = RwSignal::new(String::new());
    let filter_sn = RwSignal::new(String::new());
    let new_type = RwSignal::new(catalog::OIL_AGING_ID.to_string());

    let (auth_state, _) = use_auth();

    let load_data = move || {
        let query = InspectionQuery {
            test_type: Some(filter_type.get_untracked()),
            egat_sn: Some(filter_sn.get_untracked()),
        };
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::fetch_list(&query).await {
                Ok(mut data) => {
                    // Newest first
                    data.sort_by(|a, b| {
                        (&b.test_date, &b.test_time, b.id).cmp(&(&a.test_date, &a.test_time, a.id))
                    });
                    items.set(data);
                }
                Err(e) => set_error.set(Some(format!("ไม่สามารถโหลดผลการตรวจสอบ: {}", e))),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| load_data());

    let open_new = move || {
        let Some(category) = catalog::find(&new_type.get_untracked()) else {
            return;
        };
        open_form.set(Some((category, None, FormMode::Create)));
    };

    let delete_item = move |item: InspectionItem| {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message(&format!("ลบรายการ #{} ({})?", item.id, item.egat_sn)).ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        spawn_local(async move {
            match api::delete_by_id(item.id).await {
                Ok(()) => load_data(),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    let category_options = move || {
        catalog::all()
            .iter()
            .map(|c| view! { <option value=c.id.clone()>{c.title.clone()}</option> })
            .collect_view()
    };

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"ผลการทดสอบและตรวจสภาพ"</h1>
                    <Badge>{move || items.with(|v| v.len()).to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <select
                        class="form__input"
                        prop:value=move || new_type.get()
                        on:change=move |ev| new_type.set(event_target_value(&ev))
                    >
                        {category_options()}
                    </select>
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| open_new()
                        disabled=Signal::derive(move || {
                            !auth_state.with(|s| can_write(s, &new_type.get()))
                        })
                    >
                        "+ บันทึกผลใหม่"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <Flex gap=FlexGap::Small align=FlexAlign::End>
                    <select
                        class="form__input"
                        prop:value=move || filter_type.get()
                        on:change=move |ev| filter_type.set(event_target_value(&ev))
                    >
                        <option value="">"ทุกประเภท"</option>
                        {category_options()}
                    </select>
                    <div style="max-width: 240px;">
                        <Input value=filter_sn placeholder="EGAT S/N" />
                    </div>
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| load_data()
                        disabled=Signal::derive(move || loading.get())
                    >
                        "ค้นหา"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| {
                            filter_type.set(String::new());
                            filter_sn.set(String::new());
                            load_data();
                        }
                    >
                        "ล้าง"
                    </Button>
                </Flex>

                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell>"#"</TableHeaderCell>
                            <TableHeaderCell>"วันที่ทดสอบ"</TableHeaderCell>
                            <TableHeaderCell>"ประเภท"</TableHeaderCell>
                            <TableHeaderCell>"ชื่อหม้อแปลง"</TableHeaderCell>
                            <TableHeaderCell>"EGAT S/N"</TableHeaderCell>
                            <TableHeaderCell>"ผู้ตรวจสอบ"</TableHeaderCell>
                            <TableHeaderCell>"ผล"</TableHeaderCell>
                            <TableHeaderCell>""</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || items.get()
                            key=|i| (i.id, i.metadata.version)
                            children=move |item: InspectionItem| {
                                let Some(category) = item.category() else {
                                    return view! { <TableRow><TableCell>{item.id}</TableCell></TableRow> }.into_any();
                                };
                                let test_type = item.test_type.clone();
                                let may_edit = move || {
                                    auth_state.with(|s| s.can(Permission::EditRecords) && can_write(s, &test_type))
                                };
                                let may_delete = move || auth_state.with(|s| s.can(Permission::DeleteRecords));
                                let for_view = item.clone();
                                let for_edit = item.clone();
                                let for_delete = item.clone();
                                let condition = condition_of(&item);
                                view! {
                                    <TableRow>
                                        <TableCell><TableCellLayout>{item.id}</TableCellLayout></TableCell>
                                        <TableCell>
                                            <TableCellLayout>
                                                {format!("{} {}", format_date(&item.test_date), item.test_time)}
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>
                                                <a href="#" on:click=move |ev| {
                                                    ev.prevent_default();
                                                    open_form.set(Some((category, Some(for_view.clone()), FormMode::View)));
                                                }>{category.title.clone()}</a>
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell><TableCellLayout>{item.transformer_name.clone()}</TableCellLayout></TableCell>
                                        <TableCell><TableCellLayout>{item.egat_sn.clone()}</TableCellLayout></TableCell>
                                        <TableCell><TableCellLayout truncate=true>{item.inspector.clone()}</TableCellLayout></TableCell>
                                        <TableCell><TableCellLayout>{condition}</TableCellLayout></TableCell>
                                        <TableCell>
                                            <Show when=may_edit>
                                                <Button
                                                    appearance=ButtonAppearance::Subtle
                                                    on_click={
                                                        let item = for_edit.clone();
                                                        move |_| open_form.set(Some((category, Some(item.clone()), FormMode::Edit)))
                                                    }
                                                >
                                                    "แก้ไข"
                                                </Button>
                                            </Show>
                                            <Show when=may_delete>
                                                <Button
                                                    appearance=ButtonAppearance::Subtle
                                                    on_click={
                                                        let item = for_delete.clone();
                                                        move |_| delete_item(item.clone())
                                                    }
                                                >
                                                    "ลบ"
                                                </Button>
                                            </Show>
                                        </TableCell>
                                    </TableRow>
                                }
                                .into_any()
                            }
                        />
                    </TableBody>
                </Table>

                {move || open_form.get().map(|(category, item, mode)| {
                    let on_close = move |_| open_form.set(None);
                    let on_saved = move |_| {
                        open_form.set(None);
                        load_data();
                    };
                    match item {
                        Some(item) => view! {
                            <InspectionDetails
                                category=category
                                item=item
                                mode=mode
                                on_close=on_close
                                on_saved=on_saved
                            />
                        }.into_any(),
                        None => {
                            let defaults = auth_state.with_untracked(|s| {
                                new_record_defaults(s, &filter_sn.get_untracked())
                            });
                            view! {
                                <InspectionDetails
                                    category=category
                                    defaults=defaults
                                    mode=mode
                                    on_close=on_close
                                    on_saved=on_saved
                                />
                            }.into_any()
                        }
                    }
                })}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a002_inspection_item::InspectionItemDto;
    use contracts::system::auth::SessionInfo;
    use contracts::system::permissions::PermissionSet;

    fn auth(permissions: &[Permission]) -> AuthState {
        AuthState {
            access_token: Some("t".into()),
            session: Some(SessionInfo {
                user_id: "u".into(),
                employee_no: "12345678".into(),
                display_name: "สมชาย ใจดี".into(),
                permissions: permissions.iter().copied().collect::<PermissionSet>(),
                expires_at: String::new(),
            }),
            restoring: false,
        }
    }

    #[test]
    fn test_can_write_by_category() {
        let state = auth(&[Permission::RecordVisualInspections]);
        assert!(can_write(&state, "bushing"));
        assert!(!can_write(&state, catalog::OIL_AGING_ID));
        assert!(!can_write(&state, "unknown"));
        assert!(!can_write(&AuthState::default(), "bushing"));
    }

    #[test]
    fn test_condition_of() {
        let mut dto = InspectionItemDto {
            test_type: "bushing".into(),
            ..Default::default()
        };
        assert_eq!(condition_of(&InspectionItem::new_for_insert(&dto)), "-");
        dto.fields.insert("สภาพ".into(), "ผิดปกติ".into());
        assert_eq!(condition_of(&InspectionItem::new_for_insert(&dto)), "ผิดปกติ");
    }

    #[test]
    fn test_new_record_defaults() {
        let record = new_record_defaults(&auth(&[]), " EGAT-1 ");
        assert_eq!(record.get(header::INSPECTOR), Some("สมชาย ใจดี"));
        assert_eq!(record.get(header::EGAT_SN), Some("EGAT-1"));
        assert_eq!(record.text(header::TEST_DATE).len(), 10);
        assert!(record.get(header::TRANSFORMER_NAME).is_none());
    }
}
