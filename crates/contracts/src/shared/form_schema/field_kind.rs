//! Input kind of a schema field

use serde::{Deserialize, Serialize};

/// Kind of input rendered for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Select,
    Date,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Select => "select",
            Self::Date => "date",
        }
    }

    /// Value of the `type` attribute for `<input>` based kinds.
    /// Select fields render a `<select>` element instead.
    pub fn input_type(&self) -> Option<&'static str> {
        match self {
            Self::Text => Some("text"),
            Self::Date => Some("date"),
            Self::Select => None,
        }
    }
}
