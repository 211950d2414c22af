use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::form_schema::FieldErrors;

/// Error body returned by every failing API call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
    /// Per-field validation messages, keyed by field name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub field_errors: BTreeMap<String, String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field_errors: BTreeMap::new(),
        }
    }

    /// Validation failure with per-field messages
    pub fn invalid(errors: FieldErrors) -> Self {
        Self {
            message: "ข้อมูลไม่ถูกต้อง กรุณาตรวจสอบอีกครั้ง".to_string(),
            field_errors: errors.into_inner(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
