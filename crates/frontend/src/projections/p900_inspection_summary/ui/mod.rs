use contracts::domain::a003_inspection_category as catalog;
use contracts::projections::p900_inspection_summary::{InspectionSummaryResponse, TransformerSummaryDto};
use contracts::shared::calculation::{ConditionBand, FAIR_THRESHOLD, GOOD_THRESHOLD};
use contracts::system::permissions::Permission;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::projections::p900_inspection_summary::api;
use crate::shared::date_utils::format_date;
use crate::system::auth::guard::RequirePermission;

/// "85.00 %", or "-" when nothing was measured
pub fn format_percent(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2} %", v))
        .unwrap_or_else(|| "-".to_string())
}

fn band_cell(band: Option<ConditionBand>) -> impl IntoView {
    match band {
        Some(b) => view! { <span class=format!("badge {}", b.css_class())>{b.label()}</span> }.into_any(),
        None => view! { <span>"-"</span> }.into_any(),
    }
}

/// "บุชชิ่ง 3, ตัวถังหลัก 1" using category titles
fn type_counts(row: &TransformerSummaryDto) -> String {
    row.counts_by_type
        .iter()
        .map(|(id, count)| {
            let title = catalog::find(id).map(|c| c.title.as_str()).unwrap_or(id.as_str());
            format!("{} {}", title, count)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[component]
pub fn InspectionSummaryPage() -> impl IntoView {
    view! {
        <RequirePermission permission=Permission::ViewCalculations>
            <InspectionSummary />
        </RequirePermission>
    }
}

#[component]
fn InspectionSummary() -> impl IntoView {
    let summary: RwSignal<Option<InspectionSummaryResponse>> = RwSignal::new(None);
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);

    let load_data = move || {
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::fetch_summary().await {
                Ok(data) => summary.set(Some(data)),
                Err(e) => set_error.set(Some(format!("ไม่สามารถคำนวณผลสรุป: {}", e))),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| load_data());

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"ผลการคำนวณสภาพหม้อแปลง"</h1>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load_data()
                        disabled=Signal::derive(move || loading.get())
                    >
                        {move || if loading.get() { "กำลังคำนวณ..." } else { "คำนวณใหม่" }}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <p class="page__hint">
                    {format!(
                        "สัดส่วนผลการตรวจที่ \"ปกติ\": ตั้งแต่ {:.0}% = ดี, ตั้งแต่ {:.0}% = พอใช้, ต่ำกว่านั้น = ต้องปรับปรุง",
                        GOOD_THRESHOLD, FAIR_THRESHOLD
                    )}
                </p>

                {move || summary.get().map(|s| view! {
                    <div class="summary-totals">
                        <span>{format!("จำนวนรายการทั้งหมด: {}", s.total_records)}</span>
                        <span>{format!(" | ภาพรวม: {} ", format_percent(s.overall_percent))}</span>
                        {band_cell(s.overall_band)}
                    </div>
                })}

                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell>"EGAT S/N"</TableHeaderCell>
                            <TableHeaderCell>"ชื่อหม้อแปลง"</TableHeaderCell>
                            <TableHeaderCell>"จำนวนรายการ"</TableHeaderCell>
                            <TableHeaderCell>"แยกตามประเภท"</TableHeaderCell>
                            <TableHeaderCell>"ทดสอบล่าสุด"</TableHeaderCell>
                            <TableHeaderCell>"ปกติ / ตอบแล้ว"</TableHeaderCell>
                            <TableHeaderCell>"ร้อยละปกติ"</TableHeaderCell>
                            <TableHeaderCell>"สภาพ"</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || summary.get().map(|s| s.rows).unwrap_or_default()
                            key=|row| row.egat_sn.clone()
                            children=move |row: TransformerSummaryDto| {
                                let counts = type_counts(&row);
                                view! {
                                    <TableRow>
                                        <TableCell><TableCellLayout>{row.egat_sn.clone()}</TableCellLayout></TableCell>
                                        <TableCell><TableCellLayout>{row.transformer_name.clone()}</TableCellLayout></TableCell>
                                        <TableCell><TableCellLayout>{row.record_count}</TableCellLayout></TableCell>
                                        <TableCell><TableCellLayout truncate=true>{counts}</TableCellLayout></TableCell>
                                        <TableCell>
                                            <TableCellLayout>
                                                {row.latest_test_date.as_deref().map(format_date).unwrap_or_else(|| "-".to_string())}
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{format!("{} / {}", row.normal_count, row.answered_count)}</TableCellLayout>
                                        </TableCell>
                                        <TableCell><TableCellLayout>{format_percent(row.normal_percent)}</TableCellLayout></TableCell>
                                        <TableCell><TableCellLayout>{band_cell(row.band)}</TableCellLayout></TableCell>
                                    </TableRow>
                                }
                            }
                        />
                    </TableBody>
                </Table>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(Some(85.0)), "85.00 %");
        assert_eq!(format_percent(Some(80.95)), "80.95 %");
        assert_eq!(format_percent(None), "-");
    }

    #[test]
    fn test_type_counts_use_titles() {
        let mut row = TransformerSummaryDto::new("A");
        row.counts_by_type.insert("bushing".into(), 3);
        row.counts_by_type.insert("zzz".into(), 1);
        assert_eq!(type_counts(&row), "บุชชิ่ง 3, zzz 1");
    }
}
