//! Form state: draft values, validation and submission

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::types::{Category, Field};

/// Values typed into a form so far, keyed by field name.
///
/// Values of gated fields stay in the draft while their gate is closed,
/// so reopening the gate restores what was typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormDraft {
    values: BTreeMap<String, String>,
}

impl FormDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value for an input element; missing keys render as empty
    pub fn value_of(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn is_visible(&self, field: &Field) -> bool {
        match &field.visible_when {
            Some(gate) => gate.is_open(self.get(&gate.parent)),
            None => true,
        }
    }

    pub fn visible_fields<'a>(&self, category: &'a Category) -> Vec<&'a Field> {
        category
            .fields
            .iter()
            .filter(|f| self.is_visible(f))
            .collect()
    }

    /// Validate every visible field. The record holds the trimmed values
    /// of visible fields only.
    pub fn validate(&self, category: &Category) -> Result<FormRecord, FieldErrors> {
        let mut errors = FieldErrors::default();
        let mut record = FormRecord::default();

        for field in self.visible_fields(category) {
            let value = self.get(&field.name).unwrap_or_default().trim();
            match field.check_value(value) {
                Ok(()) => {
                    if !value.is_empty() {
                        record.values.insert(field.name.clone(), value.to_string());
                    }
                }
                Err(message) => errors.insert(field.name.clone(), message),
            }
        }

        if errors.is_empty() {
            Ok(record)
        } else {
            Err(errors)
        }
    }
}

impl From<&FormRecord> for FormDraft {
    fn from(record: &FormRecord) -> Self {
        Self {
            values: record.values.clone(),
        }
    }
}

impl From<BTreeMap<String, String>> for FormDraft {
    fn from(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }
}

/// A validated form submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormRecord {
    values: BTreeMap<String, String>,
}

impl FormRecord {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value of a field, empty when the field was left blank
    pub fn text(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.values.iter()
    }

    pub fn into_values(self) -> BTreeMap<String, String> {
        self.values
    }
}

impl From<BTreeMap<String, String>> for FormRecord {
    fn from(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }
}

/// Validation messages keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn remove(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    /// Merge another error set; entries from `other` win
    pub fn extend(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl From<BTreeMap<String, String>> for FieldErrors {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

/// How a form is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    #[default]
    Create,
    Edit,
    /// All inputs disabled, no submit action
    View,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("form is read-only")]
    ReadOnly,
    #[error("unknown field `{0}`")]
    UnknownField(String),
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(FieldErrors),
}

/// Complete state of one rendered form
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    category: Category,
    mode: FormMode,
    draft: FormDraft,
    errors: FieldErrors,
}

impl FormState {
    pub fn new(category: Category, mode: FormMode) -> Self {
        Self {
            category,
            mode,
            draft: FormDraft::new(),
            errors: FieldErrors::default(),
        }
    }

    /// Open the form pre-filled with an existing record (edit or view)
    pub fn with_record(category: Category, mode: FormMode, record: &FormRecord) -> Self {
        Self {
            draft: FormDraft::from(record),
            ..Self::new(category, mode)
        }
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_read_only(&self) -> bool {
        self.mode == FormMode::View
    }

    pub fn visible_fields(&self) -> Vec<&Field> {
        self.draft.visible_fields(&self.category)
    }

    /// Keyed update of a single field. Clears that field's error.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> Result<(), FormError> {
        if self.is_read_only() {
            return Err(FormError::ReadOnly);
        }
        if self.category.field(field).is_none() {
            return Err(FormError::UnknownField(field.to_string()));
        }
        self.draft.set(field, value);
        self.errors.remove(field);
        Ok(())
    }

    /// Validate and produce the record. Errors are kept for display.
    pub fn submit(&mut self) -> Result<FormRecord, FormError> {
        if self.is_read_only() {
            return Err(FormError::ReadOnly);
        }
        match self.draft.validate(&self.category) {
            Ok(record) => {
                self.errors = FieldErrors::default();
                Ok(record)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(FormError::Invalid(errors))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::form_schema::{Field, OTHER_OPTION};

    const CAUSE: &str = "สาเหตุความเสียหาย";
    const CAUSE_OTHER: &str = "ระบุสาเหตุอื่น ๆ";

    fn category() -> Category {
        Category::new(
            "main_tank",
            "ตัวถังหลัก",
            vec![
                Field::text("ชื่อหม้อแปลง").required(),
                Field::date("วันที่ตรวจ").required(),
                Field::select(CAUSE, ["สนิม", "รอยรั่ว", OTHER_OPTION]),
                Field::text(CAUSE_OTHER).when_other(CAUSE).required(),
                Field::text("หมายเหตุ"),
            ],
        )
    }

    fn filled() -> FormState {
        let mut form = FormState::new(category(), FormMode::Create);
        form.set("ชื่อหม้อแปลง", "KT1A").unwrap();
        form.set("วันที่ตรวจ", "2024-05-01").unwrap();
        form
    }

    #[test]
    fn test_any_missing_required_field_blocks_submit() {
        let required: Vec<String> = category()
            .required_fields()
            .filter(|f| !f.is_gated())
            .map(|f| f.name.clone())
            .collect();
        assert_eq!(required.len(), 2);

        for missing in &required {
            let mut form = filled();
            form.set(missing, "").unwrap();
            match form.submit() {
                Err(FormError::Invalid(errors)) => {
                    assert_eq!(errors.len(), 1);
                    assert!(errors.get(missing).is_some());
                }
                other => panic!("expected validation failure, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_complete_form_yields_record() {
        let mut form = filled();
        form.set("หมายเหตุ", "  ").unwrap();
        let record = form.submit().unwrap();
        assert_eq!(record.get("ชื่อหม้อแปลง"), Some("KT1A"));
        assert_eq!(record.get("หมายเหตุ"), None);
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_other_reveals_exactly_one_field() {
        let mut form = filled();
        let base = form.visible_fields().len();

        form.set(CAUSE, OTHER_OPTION).unwrap();
        assert_eq!(form.visible_fields().len(), base + 1);

        form.set(CAUSE, "สนิม").unwrap();
        assert_eq!(form.visible_fields().len(), base);
    }

    #[test]
    fn test_hidden_value_is_kept_but_not_submitted() {
        let mut form = filled();
        form.set(CAUSE, OTHER_OPTION).unwrap();
        form.set(CAUSE_OTHER, "ฟ้าผ่า").unwrap();
        assert_eq!(form.submit().unwrap().get(CAUSE_OTHER), Some("ฟ้าผ่า"));

        form.set(CAUSE, "สนิม").unwrap();
        assert_eq!(form.draft().get(CAUSE_OTHER), Some("ฟ้าผ่า"));
        assert_eq!(form.submit().unwrap().get(CAUSE_OTHER), None);

        form.set(CAUSE, OTHER_OPTION).unwrap();
        assert_eq!(form.draft().get(CAUSE_OTHER), Some("ฟ้าผ่า"));
    }

    #[test]
    fn test_gated_required_field_only_checked_when_visible() {
        let mut form = filled();
        form.set(CAUSE, OTHER_OPTION).unwrap();
        assert!(matches!(form.submit(), Err(FormError::Invalid(_))));
        assert!(form.errors().get(CAUSE_OTHER).is_some());

        form.set(CAUSE, "รอยรั่ว").unwrap();
        assert!(form.submit().is_ok());
    }

    #[test]
    fn test_set_clears_field_error() {
        let mut form = FormState::new(category(), FormMode::Create);
        assert!(form.submit().is_err());
        assert!(form.errors().get("ชื่อหม้อแปลง").is_some());

        form.set("ชื่อหม้อแปลง", "KT1A").unwrap();
        assert!(form.errors().get("ชื่อหม้อแปลง").is_none());
        assert!(form.errors().get("วันที่ตรวจ").is_some());
    }

    #[test]
    fn test_view_mode_is_read_only() {
        let record = filled().submit().unwrap();
        let mut form = FormState::with_record(category(), FormMode::View, &record);
        assert_eq!(form.draft().get("ชื่อหม้อแปลง"), Some("KT1A"));
        assert_eq!(form.set("หมายเหตุ", "x"), Err(FormError::ReadOnly));
        assert_eq!(form.submit(), Err(FormError::ReadOnly));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut form = FormState::new(category(), FormMode::Edit);
        assert_eq!(
            form.set("ไม่มีช่องนี้", "x"),
            Err(FormError::UnknownField("ไม่มีช่องนี้".to_string()))
        );
    }
}
