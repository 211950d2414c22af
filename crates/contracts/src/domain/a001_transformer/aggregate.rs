use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::common::{AggregateRoot, EntityMetadata};
use crate::shared::form_schema::{
    Category, Field, FieldErrors, FormDraft, FormRecord, ValidationRules,
};

/// Form labels, which double as record keys
pub mod fields {
    pub const NAME: &str = "ชื่อหม้อแปลง";
    pub const EGAT_SN: &str = "EGAT S/N";
    pub const SUBSTATION: &str = "สถานีไฟฟ้า";
    pub const MANUFACTURER: &str = "ผู้ผลิต";
    pub const RATED_MVA: &str = "พิกัดกำลัง (MVA)";
    pub const VOLTAGE_KV: &str = "ระดับแรงดัน (kV)";
    pub const IMPORTANCE: &str = "ความสำคัญ";
}

/// Comparison key of an EGAT serial number: trimmed, ASCII upper case.
///
/// The inventory, inspection filters and the summary all match serials
/// through this key, so "egat-tr-1" and "EGAT-TR-1" are one transformer.
pub fn serial_key(egat_sn: &str) -> String {
    egat_sn.trim().to_ascii_uppercase()
}

// ============================================================================
// Importance
// ============================================================================

/// Importance class used to rank transformers in the inventory list
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Critical,
    High,
    #[default]
    Normal,
}

impl Importance {
    pub const ALL: [Importance; 3] = [Self::Critical, Self::High, Self::Normal];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Critical => "สูงมาก",
            Self::High => "สูง",
            Self::Normal => "ปกติ",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.label() == label)
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Power transformer in the equipment inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transformer {
    pub id: String,
    pub name: String,
    #[serde(rename = "egatSN")]
    pub egat_sn: String,
    pub substation: String,
    pub manufacturer: String,
    pub rated_mva: Option<f64>,
    pub voltage_kv: String,
    pub importance: Importance,
    pub metadata: EntityMetadata,
}

impl Transformer {
    /// Schema of the create/edit form
    pub fn form_category() -> Category {
        Category::new(
            "a001_transformer",
            "หม้อแปลงไฟฟ้า",
            vec![
                Field::text(fields::NAME).required(),
                Field::text(fields::EGAT_SN).required(),
                Field::text(fields::SUBSTATION).required(),
                Field::text(fields::MANUFACTURER),
                Field::text(fields::RATED_MVA)
                    .with_rules(ValidationRules::numeric(Some(0.0), Some(2000.0))),
                Field::text(fields::VOLTAGE_KV),
                Field::select(fields::IMPORTANCE, Importance::ALL.map(|i| i.label()))
                    .required(),
            ],
        )
    }

    /// New transformer; the id is assigned by the store
    pub fn new_for_insert(dto: &TransformerDto) -> Self {
        let mut transformer = Self {
            id: String::new(),
            name: String::new(),
            egat_sn: String::new(),
            substation: String::new(),
            manufacturer: String::new(),
            rated_mva: None,
            voltage_kv: String::new(),
            importance: Importance::default(),
            metadata: EntityMetadata::new(),
        };
        transformer.update(dto);
        transformer
    }

    /// Replace every editable field from the DTO
    pub fn update(&mut self, dto: &TransformerDto) {
        self.name = dto.name.trim().to_string();
        self.egat_sn = dto.egat_sn.trim().to_string();
        self.substation = dto.substation.trim().to_string();
        self.manufacturer = dto.manufacturer.trim().to_string();
        self.rated_mva = dto.rated_mva;
        self.voltage_kv = dto.voltage_kv.trim().to_string();
        self.importance = dto.importance;
    }

    /// Form values of this transformer, for edit and view forms
    pub fn to_record(&self) -> FormRecord {
        let mut values = BTreeMap::new();
        values.insert(fields::NAME.to_string(), self.name.clone());
        values.insert(fields::EGAT_SN.to_string(), self.egat_sn.clone());
        values.insert(fields::SUBSTATION.to_string(), self.substation.clone());
        values.insert(fields::MANUFACTURER.to_string(), self.manufacturer.clone());
        if let Some(mva) = self.rated_mva {
            values.insert(fields::RATED_MVA.to_string(), mva.to_string());
        }
        values.insert(fields::VOLTAGE_KV.to_string(), self.voltage_kv.clone());
        values.insert(
            fields::IMPORTANCE.to_string(),
            self.importance.label().to_string(),
        );
        values.retain(|_, v| !v.is_empty());
        FormRecord::from(values)
    }

    /// Validate against the form schema
    pub fn validate(&self) -> Result<(), FieldErrors> {
        FormDraft::from(&self.to_record())
            .validate(&Self::form_category())
            .map(|_| ())
    }
}

impl AggregateRoot for Transformer {
    type Id = String;

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
        "transformers"
    }

    fn element_name() -> &'static str {
        "หม้อแปลงไฟฟ้า"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO for create/update
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformerDto {
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "egatSN")]
    pub egat_sn: String,
    pub substation: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub rated_mva: Option<f64>,
    #[serde(default)]
    pub voltage_kv: String,
    #[serde(default)]
    pub importance: Importance,
}

impl TransformerDto {
    /// Build the DTO from a submitted form record
    pub fn from_record(id: Option<String>, record: &FormRecord) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();

        let rated_mva = match record.get(fields::RATED_MVA) {
            Some(raw) => match raw.parse::<f64>() {
                Ok(v) => Some(v),
                Err(_) => {
                    errors.insert(fields::RATED_MVA, "พิกัดกำลัง (MVA) ต้องเป็นตัวเลข");
                    None
                }
            },
            None => None,
        };

        let importance = match record.get(fields::IMPORTANCE) {
            Some(label) => Importance::from_label(label).unwrap_or_else(|| {
                errors.insert(fields::IMPORTANCE, "ความสำคัญ: ค่าที่เลือกไม่อยู่ในรายการ");
                Importance::default()
            }),
            None => Importance::default(),
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            id,
            name: record.text(fields::NAME),
            egat_sn: record.text(fields::EGAT_SN),
            substation: record.text(fields::SUBSTATION),
            manufacturer: record.text(fields::MANUFACTURER),
            rated_mva,
            voltage_kv: record.text(fields::VOLTAGE_KV),
            importance,
        })
    }
}
