use std::collections::BTreeMap;

use contracts::domain::a001_transformer::{serial_key, Transformer};
use contracts::domain::a002_inspection_item::{InspectionItem, InspectionQuery};
use contracts::domain::a003_inspection_category::{CONDITION_FIELDS, NORMAL_VALUE};
use contracts::projections::p900_inspection_summary::{
    InspectionSummaryResponse, TransformerSummaryDto,
};
use contracts::shared::calculation::{percentage, ConditionBand};

use crate::domain::{a001_transformer, a002_inspection_item};
use crate::shared::state::AppState;

/// Summary over every registered transformer and every stored record
pub async fn get_summary(state: &AppState) -> InspectionSummaryResponse {
    let transformers = a001_transformer::service::list_all(state).await;
    let items = a002_inspection_item::service::list(state, &InspectionQuery::default()).await;
    build_summary(&transformers, &items)
}

/// One row per transformer serial, ordered by serial. Serials are matched
/// by [`serial_key`]; a row shows the inventory spelling when the
/// transformer is registered. Registered transformers without records get
/// an empty row.
pub fn build_summary(
    transformers: &[Transformer],
    items: &[InspectionItem],
) -> InspectionSummaryResponse {
    let mut rows: BTreeMap<String, TransformerSummaryDto> = BTreeMap::new();
    // (date, time) of the record that named each row
    let mut latest: BTreeMap<String, (String, String)> = BTreeMap::new();

    for t in transformers {
        let row = rows
            .entry(serial_key(&t.egat_sn))
            .or_insert_with(|| TransformerSummaryDto::new(&t.egat_sn));
        row.transformer_name = t.name.clone();
    }

    let mut total_answered = 0u32;
    let mut total_normal = 0u32;

    for item in items {
        let key = serial_key(&item.egat_sn);
        let row = rows
            .entry(key.clone())
            .or_insert_with(|| TransformerSummaryDto::new(item.egat_sn.trim()));

        row.record_count += 1;
        *row.counts_by_type.entry(item.test_type.clone()).or_insert(0) += 1;

        let stamp = (item.test_date.clone(), item.test_time.clone());
        let newer = latest.get(&key).map_or(true, |seen| stamp >= *seen);
        if newer {
            row.latest_test_date = Some(item.test_date.clone());
            // Registered transformers keep their inventory name
            if !transformers.iter().any(|t| serial_key(&t.egat_sn) == key) {
                row.transformer_name = item.transformer_name.clone();
            }
            latest.insert(key, stamp);
        }

        for field in CONDITION_FIELDS {
            if let Some(answer) = item.answer(field) {
                row.answered_count += 1;
                total_answered += 1;
                if answer == NORMAL_VALUE {
                    row.normal_count += 1;
                    total_normal += 1;
                }
            }
        }
    }

    let rows: Vec<TransformerSummaryDto> = rows
        .into_values()
        .map(|mut row| {
            row.finish();
            row
        })
        .collect();

    let overall_percent = percentage(total_normal, total_answered);
    InspectionSummaryResponse {
        total_records: items.len() as u32,
        rows,
        overall_percent,
        overall_band: overall_percent.map(ConditionBand::from_percent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_transformer::{Importance, TransformerDto};
    use contracts::domain::a002_inspection_item::InspectionItemDto;

    fn item(
        egat_sn: &str,
        test_type: &str,
        date: &str,
        answer: Option<(&str, &str)>,
    ) -> InspectionItem {
        let mut dto = InspectionItemDto {
            transformer_name: format!("name-{}", date),
            egat_sn: egat_sn.into(),
            test_type: test_type.into(),
            test_date: date.into(),
            test_time: "08:00".into(),
            inspector: "x".into(),
            ..Default::default()
        };
        if let Some((field, value)) = answer {
            dto.fields.insert(field.into(), value.into());
        }
        InspectionItem::new_for_insert(&dto)
    }

    #[test]
    fn test_empty_summary_has_no_percentages() {
        let summary = build_summary(&[], &[]);
        assert!(summary.rows.is_empty());
        assert_eq!(summary.total_records, 0);
        assert_eq!(summary.overall_percent, None);
        assert_eq!(summary.overall_band, None);
    }

    #[test]
    fn test_counts_and_bands() {
        let mut items = Vec::new();
        for i in 0..17 {
            let date = format!("2024-01-{:02}", i + 1);
            items.push(item("A", "bushing", &date, Some(("สภาพ", "ปกติ"))));
        }
        for _ in 0..3 {
            let answer = Some(("ผลการประเมิน", "ผิดปกติ"));
            items.push(item("A", "oil_aging", "2023-12-01", answer));
        }
        items.push(item("B", "cooling", "2024-02-01", Some(("สภาพ", "ผิดปกติ"))));
        items.push(item("B", "cooling", "2024-02-02", None));

        let summary = build_summary(&[], &items);
        assert_eq!(summary.total_records, 22);
        assert_eq!(summary.rows.len(), 2);

        let a = &summary.rows[0];
        assert_eq!(a.egat_sn, "A");
        assert_eq!(a.record_count, 20);
        assert_eq!(a.counts_by_type.get("bushing"), Some(&17));
        assert_eq!(a.counts_by_type.get("oil_aging"), Some(&3));
        assert_eq!(a.latest_test_date.as_deref(), Some("2024-01-17"));
        assert_eq!(a.transformer_name, "name-2024-01-17");
        assert_eq!(a.normal_percent, Some(85.0));
        assert_eq!(a.band, Some(ConditionBand::Good));

        let b = &summary.rows[1];
        assert_eq!(b.answered_count, 1);
        assert_eq!(b.normal_percent, Some(0.0));
        assert_eq!(b.band, Some(ConditionBand::Poor));

        // 17 normal of 21 answered
        assert_eq!(summary.overall_percent, Some(80.95));
        assert_eq!(summary.overall_band, Some(ConditionBand::Fair));
    }

    #[test]
    fn test_serials_match_regardless_of_case() {
        let t = Transformer::new_for_insert(&TransformerDto {
            name: "KT1A".into(),
            egat_sn: "EGAT-TR-0001".into(),
            substation: "s".into(),
            ..Default::default()
        });
        let items = [
            item("egat-tr-0001", "bushing", "2024-01-01", Some(("สภาพ", "ปกติ"))),
            item(" EGAT-TR-0001", "cooling", "2024-01-02", None),
        ];
        let summary = build_summary(&[t], &items);

        assert_eq!(summary.rows.len(), 1);
        let row = &summary.rows[0];
        assert_eq!(row.egat_sn, "EGAT-TR-0001");
        assert_eq!(row.transformer_name, "KT1A");
        assert_eq!(row.record_count, 2);
        assert_eq!(row.latest_test_date.as_deref(), Some("2024-01-02"));
    }

    #[test]
    fn test_registered_transformer_without_records() {
        let t = Transformer::new_for_insert(&TransformerDto {
            name: "KT9".into(),
            egat_sn: "Z".into(),
            substation: "s".into(),
            importance: Importance::High,
            ..Default::default()
        });
        let summary = build_summary(&[t], &[item("Z", "bushing", "2024-01-01", None)]);
        assert_eq!(summary.rows.len(), 1);
        assert_eq!(summary.rows[0].transformer_name, "KT9");
        assert_eq!(summary.rows[0].record_count, 1);
        assert_eq!(summary.rows[0].normal_percent, None);
    }
}
