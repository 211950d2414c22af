//! Category and field declarations

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::field_kind::FieldKind;
use super::validation::ValidationRules;

/// Sentinel option that opens a gated free-text field
pub const OTHER_OPTION: &str = "other";

/// Visibility condition of a field: shown only while `parent` holds `equals`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldGate {
    pub parent: String,
    pub equals: String,
}

impl FieldGate {
    /// Gate opened by the `"other"` option of `parent`
    pub fn other(parent: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            equals: OTHER_OPTION.to_string(),
        }
    }

    pub fn is_open(&self, parent_value: Option<&str>) -> bool {
        parent_value == Some(self.equals.as_str())
    }
}

/// One input of a form. `name` is both the display label and the record key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub rules: ValidationRules,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_when: Option<FieldGate>,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            rules: ValidationRules::none(),
            options: Vec::new(),
            visible_when: None,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Date)
    }

    pub fn select<I, S>(name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut field = Self::new(name, FieldKind::Select);
        field.options = options.into_iter().map(Into::into).collect();
        field
    }

    pub fn required(mut self) -> Self {
        self.rules.required = true;
        self
    }

    pub fn with_rules(mut self, rules: ValidationRules) -> Self {
        self.rules = rules;
        self
    }

    /// Show this field only while `parent` is set to `"other"`
    pub fn when_other(mut self, parent: impl Into<String>) -> Self {
        self.visible_when = Some(FieldGate::other(parent));
        self
    }

    pub fn is_gated(&self) -> bool {
        self.visible_when.is_some()
    }

    /// Check a raw value against the field's kind, options and rules
    pub fn check_value(&self, value: &str) -> Result<(), String> {
        self.rules.validate_string(value, &self.name)?;

        let value = value.trim();
        if value.is_empty() {
            return Ok(());
        }

        match self.kind {
            FieldKind::Text => Ok(()),
            FieldKind::Date => chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(|_| ())
                .map_err(|_| format!("{} ต้องเป็นวันที่ในรูปแบบ YYYY-MM-DD", self.name)),
            FieldKind::Select => {
                if self.options.is_empty() || self.options.iter().any(|o| o == value) {
                    Ok(())
                } else {
                    Err(format!("{}: ค่าที่เลือกไม่อยู่ในรายการ", self.name))
                }
            }
        }
    }
}

/// Declaration error found by [`Category::check`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("category `{0}` has an empty field name")]
    EmptyFieldName(String),
    #[error("category `{category}` declares field `{field}` twice")]
    DuplicateField { category: String, field: String },
    #[error("field `{field}` is gated by `{parent}`, which is not an earlier select field")]
    UnknownGateParent { field: String, parent: String },
    #[error("field `{field}` is gated by option `{option}` that `{parent}` does not offer")]
    UnknownGateOption {
        field: String,
        parent: String,
        option: String,
    },
}

/// A named inspection subject and the ordered fields collected for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub title: String,
    pub fields: Vec<Field>,
}

impl Category {
    pub fn new(id: impl Into<String>, title: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.rules.required)
    }

    /// Verify the declaration: unique non-empty names, and every gate
    /// refers to an earlier select field offering the gate option
    pub fn check(&self) -> Result<(), SchemaError> {
        let mut seen: HashSet<&str> = HashSet::new();

        for (index, field) in self.fields.iter().enumerate() {
            if field.name.trim().is_empty() {
                return Err(SchemaError::EmptyFieldName(self.id.clone()));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    category: self.id.clone(),
                    field: field.name.clone(),
                });
            }

            if let Some(gate) = &field.visible_when {
                let parent = self.fields[..index]
                    .iter()
                    .find(|f| f.name == gate.parent && f.kind == FieldKind::Select)
                    .ok_or_else(|| SchemaError::UnknownGateParent {
                        field: field.name.clone(),
                        parent: gate.parent.clone(),
                    })?;

                if !parent.options.iter().any(|o| *o == gate.equals) {
                    return Err(SchemaError::UnknownGateOption {
                        field: field.name.clone(),
                        parent: gate.parent.clone(),
                        option: gate.equals.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn damage_category() -> Category {
        Category::new(
            "bushing",
            "บุชชิ่ง",
            vec![
                Field::select("สาเหตุความเสียหาย", ["สนิม", "รอยรั่ว", OTHER_OPTION]).required(),
                Field::text("ระบุสาเหตุอื่น ๆ").when_other("สาเหตุความเสียหาย"),
                Field::date("วันที่ตรวจพบ"),
            ],
        )
    }

    #[test]
    fn test_valid_category_passes_check() {
        assert_eq!(damage_category().check(), Ok(()));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let mut category = damage_category();
        category.fields.push(Field::text("วันที่ตรวจพบ"));
        assert!(matches!(
            category.check(),
            Err(SchemaError::DuplicateField { .. })
        ));
    }

    #[test]
    fn test_gate_must_follow_its_parent() {
        let category = Category::new(
            "x",
            "x",
            vec![
                Field::text("อื่น ๆ").when_other("สาเหตุ"),
                Field::select("สาเหตุ", ["a", OTHER_OPTION]),
            ],
        );
        assert!(matches!(
            category.check(),
            Err(SchemaError::UnknownGateParent { .. })
        ));
    }

    #[test]
    fn test_gate_option_must_exist() {
        let category = Category::new(
            "x",
            "x",
            vec![
                Field::select("สาเหตุ", ["a", "b"]),
                Field::text("อื่น ๆ").when_other("สาเหตุ"),
            ],
        );
        assert!(matches!(
            category.check(),
            Err(SchemaError::UnknownGateOption { .. })
        ));
    }

    #[test]
    fn test_check_value_by_kind() {
        let category = damage_category();
        let cause = category.field("สาเหตุความเสียหาย").unwrap();
        assert!(cause.check_value("สนิม").is_ok());
        assert!(cause.check_value("ไฟไหม้").is_err());
        assert!(cause.check_value("").is_err());

        let date = category.field("วันที่ตรวจพบ").unwrap();
        assert!(date.check_value("2024-02-29").is_ok());
        assert!(date.check_value("2023-02-29").is_err());
        assert!(date.check_value("29/02/2024").is_err());
        assert!(date.check_value("").is_ok());
    }

    #[test]
    fn test_category_json_shape() {
        let json = serde_json::to_value(damage_category()).unwrap();
        assert_eq!(json["fields"][0]["kind"], "select");
        assert_eq!(json["fields"][1]["visible_when"]["equals"], "other");
        assert!(json["fields"][2].get("options").is_none());

        let back: Category = serde_json::from_value(json).unwrap();
        assert_eq!(back, damage_category());
    }
}
