use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::a001_transformer::serial_key;
use crate::domain::a003_inspection_category as catalog;
use crate::domain::common::{AggregateRoot, EntityMetadata};
use crate::shared::form_schema::{Category, Field, FieldErrors, FormDraft, FormRecord, ValidationRules};

/// Header labels shared by every inspection form
pub mod header {
    pub const TRANSFORMER_NAME: &str = "ชื่อหม้อแปลง";
    pub const EGAT_SN: &str = "EGAT S/N";
    pub const TEST_DATE: &str = "วันที่ทดสอบ";
    pub const TEST_TIME: &str = "เวลาทดสอบ";
    pub const INSPECTOR: &str = "ผู้ตรวจสอบ";

    pub const ALL: [&str; 5] = [TRANSFORMER_NAME, EGAT_SN, TEST_DATE, TEST_TIME, INSPECTOR];
}

/// Key used in field errors when the test type itself is wrong
pub const TEST_TYPE_KEY: &str = "testType";

// ============================================================================
// Aggregate Root
// ============================================================================

/// One recorded test or inspection of a transformer.
/// `fields` holds the answers to the category named by `test_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionItem {
    pub id: i64,
    pub transformer_name: String,
    #[serde(rename = "egatSN")]
    pub egat_sn: String,
    pub test_type: String,
    pub test_date: String,
    pub test_time: String,
    pub inspector: String,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    pub metadata: EntityMetadata,
}

impl InspectionItem {
    /// The full form for a category: header fields followed by the
    /// category's own fields
    pub fn form_category(category: &Category) -> Category {
        let mut fields = vec![
            Field::text(header::TRANSFORMER_NAME).required(),
            Field::text(header::EGAT_SN).required(),
            Field::date(header::TEST_DATE).required(),
            Field::text(header::TEST_TIME).with_rules(ValidationRules {
                max_length: Some(5),
                ..ValidationRules::required()
            }),
            Field::text(header::INSPECTOR).required(),
        ];
        fields.extend(category.fields.iter().cloned());
        Category::new(category.id.clone(), category.title.clone(), fields)
    }

    pub fn new_for_insert(dto: &InspectionItemDto) -> Self {
        let mut item = Self {
            id: 0,
            transformer_name: String::new(),
            egat_sn: String::new(),
            test_type: String::new(),
            test_date: String::new(),
            test_time: String::new(),
            inspector: String::new(),
            fields: BTreeMap::new(),
            metadata: EntityMetadata::new(),
        };
        item.update(dto);
        item
    }

    /// Full replacement of the record content
    pub fn update(&mut self, dto: &InspectionItemDto) {
        self.transformer_name = dto.transformer_name.trim().to_string();
        self.egat_sn = dto.egat_sn.trim().to_string();
        self.test_type = dto.test_type.clone();
        self.test_date = dto.test_date.trim().to_string();
        self.test_time = dto.test_time.trim().to_string();
        self.inspector = dto.inspector.trim().to_string();
        self.fields = dto.fields.clone();
    }

    pub fn category(&self) -> Option<&'static Category> {
        catalog::find(&self.test_type)
    }

    /// Header and answers as one record, for edit and view forms
    pub fn to_record(&self) -> FormRecord {
        let mut values = self.fields.clone();
        values.insert(header::TRANSFORMER_NAME.into(), self.transformer_name.clone());
        values.insert(header::EGAT_SN.into(), self.egat_sn.clone());
        values.insert(header::TEST_DATE.into(), self.test_date.clone());
        values.insert(header::TEST_TIME.into(), self.test_time.clone());
        values.insert(header::INSPECTOR.into(), self.inspector.clone());
        values.retain(|_, v| !v.is_empty());
        FormRecord::from(values)
    }

    /// Answer of a field, if given
    pub fn answer(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

impl AggregateRoot for InspectionItem {
    type Id = i64;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn assign_id(&mut self, id: Self::Id) {
        self.id = id;
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.metadata
    }

    fn collection_name() -> &'static str {
        "inspections"
    }

    fn element_name() -> &'static str {
        "ผลการตรวจสอบ"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO for create/update
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionItemDto {
    pub id: Option<i64>,
    pub transformer_name: String,
    #[serde(rename = "egatSN")]
    pub egat_sn: String,
    pub test_type: String,
    pub test_date: String,
    pub test_time: String,
    pub inspector: String,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl InspectionItemDto {
    /// Split a submitted form record into header and answers
    pub fn from_record(id: Option<i64>, test_type: &str, record: &FormRecord) -> Self {
        let fields = record
            .iter()
            .filter(|(k, _)| !header::ALL.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Self {
            id,
            transformer_name: record.text(header::TRANSFORMER_NAME),
            egat_sn: record.text(header::EGAT_SN),
            test_type: test_type.to_string(),
            test_date: record.text(header::TEST_DATE),
            test_time: record.text(header::TEST_TIME),
            inspector: record.text(header::INSPECTOR),
            fields,
        }
    }

    fn to_draft(&self) -> FormDraft {
        let mut draft = FormDraft::from(self.fields.clone());
        draft.set(header::TRANSFORMER_NAME, self.transformer_name.as_str());
        draft.set(header::EGAT_SN, self.egat_sn.as_str());
        draft.set(header::TEST_DATE, self.test_date.as_str());
        draft.set(header::TEST_TIME, self.test_time.as_str());
        draft.set(header::INSPECTOR, self.inspector.as_str());
        draft
    }

    /// Validate against the category named by `test_type` and return the
    /// normalized DTO: trimmed values, answers limited to visible fields
    /// of the category.
    pub fn validated(&self) -> Result<Self, FieldErrors> {
        let Some(category) = catalog::find(&self.test_type) else {
            let mut errors = FieldErrors::default();
            errors.insert(TEST_TYPE_KEY, format!("ไม่พบประเภทการทดสอบ '{}'", self.test_type));
            return Err(errors);
        };

        let form = InspectionItem::form_category(category);
        let draft = self.to_draft();
        let mut errors = FieldErrors::default();

        let record = match draft.validate(&form) {
            Ok(record) => Some(record),
            Err(e) => {
                errors.extend(e);
                None
            }
        };

        let time = self.test_time.trim();
        if !time.is_empty()
            && errors.get(header::TEST_TIME).is_none()
            && chrono::NaiveTime::parse_from_str(time, "%H:%M").is_err()
        {
            errors.insert(header::TEST_TIME, "เวลาทดสอบต้องอยู่ในรูปแบบ HH:MM");
        }

        match record {
            Some(record) if errors.is_empty() => {
                Ok(Self::from_record(self.id, &category.id, &record))
            }
            _ => Err(errors),
        }
    }
}

/// List filter for inspections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub egat_sn: Option<String>,
}

impl InspectionQuery {
    pub fn matches(&self, item: &InspectionItem) -> bool {
        let test_type_ok = self
            .test_type
            .as_deref()
            .map_or(true, |t| t.is_empty() || item.test_type == t);
        let egat_sn_ok = self
            .egat_sn
            .as_deref()
            .map(serial_key)
            .map_or(true, |sn| sn.is_empty() || serial_key(&item.egat_sn) == sn);
        test_type_ok && egat_sn_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::form_schema::OTHER_OPTION;

    fn dto() -> InspectionItemDto {
        let mut fields = BTreeMap::new();
        fields.insert("สภาพ".to_string(), "ผิดปกติ".to_string());
        fields.insert("สาเหตุความเสียหาย".to_string(), "สนิม".to_string());
        fields.insert("ระบุสาเหตุอื่น ๆ".to_string(), "ค้างจากรอบก่อน".to_string());
        fields.insert("ไม่อยู่ในแบบฟอร์ม".to_string(), "x".to_string());

        InspectionItemDto {
            id: None,
            transformer_name: "KT1A".into(),
            egat_sn: "EGAT-0001".into(),
            test_type: "main_tank".into(),
            test_date: "2024-05-01".into(),
            test_time: "09:30".into(),
            inspector: " สมชาย ".into(),
            fields,
        }
    }

    #[test]
    fn test_form_category_prepends_header() {
        let category = catalog::find("bushing").unwrap();
        let form = InspectionItem::form_category(category);
        assert_eq!(form.check(), Ok(()));
        assert_eq!(form.fields.len(), category.fields.len() + header::ALL.len());
        assert_eq!(form.fields[0].name, header::TRANSFORMER_NAME);
    }

    #[test]
    fn test_validated_drops_hidden_and_unknown_answers() {
        let normalized = dto().validated().unwrap();
        assert_eq!(normalized.inspector, "สมชาย");
        assert_eq!(normalized.fields.get("สาเหตุความเสียหาย").map(String::as_str), Some("สนิม"));
        assert!(!normalized.fields.contains_key("ระบุสาเหตุอื่น ๆ"));
        assert!(!normalized.fields.contains_key("ไม่อยู่ในแบบฟอร์ม"));
        assert!(!normalized.fields.contains_key(header::INSPECTOR));
    }

    #[test]
    fn test_validated_requires_gated_text_for_other() {
        let mut dto = dto();
        dto.fields.insert("สาเหตุความเสียหาย".into(), OTHER_OPTION.into());
        dto.fields.remove("ระบุสาเหตุอื่น ๆ");
        let errors = dto.validated().unwrap_err();
        assert!(errors.get("ระบุสาเหตุอื่น ๆ").is_some());
    }

    #[test]
    fn test_validated_checks_header() {
        let mut dto = dto();
        dto.test_time = "9.30".into();
        dto.inspector.clear();
        let errors = dto.validated().unwrap_err();
        assert!(errors.get(header::TEST_TIME).is_some());
        assert!(errors.get(header::INSPECTOR).is_some());
    }

    #[test]
    fn test_unknown_test_type() {
        let mut dto = dto();
        dto.test_type = "dga".into();
        let errors = dto.validated().unwrap_err();
        assert!(errors.get(TEST_TYPE_KEY).is_some());
    }

    #[test]
    fn test_record_round_trip_through_form() {
        let item = InspectionItem::new_for_insert(&dto().validated().unwrap());
        let record = item.to_record();
        assert_eq!(record.get(header::EGAT_SN), Some("EGAT-0001"));

        let back = InspectionItemDto::from_record(Some(3), &item.test_type, &record);
        assert_eq!(back.id, Some(3));
        assert_eq!(back.fields, item.fields);
        assert_eq!(back.test_time, "09:30");
    }

    #[test]
    fn test_query_filters() {
        let item = InspectionItem::new_for_insert(&dto());
        assert!(InspectionQuery::default().matches(&item));

        let by_type = InspectionQuery {
            test_type: Some("bushing".into()),
            egat_sn: None,
        };
        assert!(!by_type.matches(&item));

        let by_sn = InspectionQuery {
            test_type: Some("main_tank".into()),
            egat_sn: Some("egat-0001".into()),
        };
        assert!(by_sn.matches(&item));
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(InspectionItem::new_for_insert(&dto())).unwrap();
        assert_eq!(json["egatSN"], "EGAT-0001");
        assert_eq!(json["testType"], "main_tank");
        assert!(json["fields"].is_object());
    }
}
