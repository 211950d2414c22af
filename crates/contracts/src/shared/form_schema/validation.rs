//! Validation rules attached to schema fields

use serde::{Deserialize, Serialize};

/// Validation rules for a field.
/// Every rule except `required` is skipped for an empty value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationRules {
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Lower bound; a non-empty value must parse as a number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound; a non-empty value must parse as a number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl ValidationRules {
    /// No constraints at all
    pub const fn none() -> Self {
        Self {
            required: false,
            min_length: None,
            max_length: None,
            min: None,
            max: None,
        }
    }

    pub const fn required() -> Self {
        Self {
            required: true,
            min_length: None,
            max_length: None,
            min: None,
            max: None,
        }
    }

    /// Numeric value within `[min, max]`, optional unless `required` is set later
    pub const fn numeric(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            required: false,
            min_length: None,
            max_length: None,
            min,
            max,
        }
    }

    pub const fn is_required(&self) -> bool {
        self.required
    }

    pub const fn is_numeric(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// Validate a raw string value against the rules
    pub fn validate_string(&self, value: &str, field_label: &str) -> Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            if self.required {
                return Err(format!("กรุณากรอก{}", field_label));
            }
            return Ok(());
        }

        let length = value.chars().count();
        if let Some(min) = self.min_length {
            if length < min {
                return Err(format!(
                    "{} ต้องมีอย่างน้อย {} ตัวอักษร",
                    field_label, min
                ));
            }
        }
        if let Some(max) = self.max_length {
            if length > max {
                return Err(format!("{} ต้องไม่เกิน {} ตัวอักษร", field_label, max));
            }
        }

        if self.is_numeric() {
            let number: f64 = value
                .parse()
                .map_err(|_| format!("{} ต้องเป็นตัวเลข", field_label))?;
            self.validate_number(number, field_label)?;
        }

        Ok(())
    }

    /// Validate a numeric value against min/max rules
    pub fn validate_number(&self, value: f64, field_label: &str) -> Result<(), String> {
        if !value.is_finite() {
            return Err(format!("{} ต้องเป็นตัวเลข", field_label));
        }
        if let Some(min) = self.min {
            if value < min {
                return Err(format!("{} ต้องไม่น้อยกว่า {}", field_label, min));
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return Err(format!("{} ต้องไม่มากกว่า {}", field_label, max));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_blank() {
        let rules = ValidationRules::required();
        assert!(rules.validate_string("", "ชื่อ").is_err());
        assert!(rules.validate_string("   ", "ชื่อ").is_err());
        assert!(rules.validate_string("T1", "ชื่อ").is_ok());
    }

    #[test]
    fn test_optional_empty_skips_other_rules() {
        let rules = ValidationRules {
            min_length: Some(3),
            ..ValidationRules::numeric(Some(0.0), None)
        };
        assert!(rules.validate_string("", "kV").is_ok());
    }

    #[test]
    fn test_length_counts_characters() {
        let rules = ValidationRules {
            max_length: Some(4),
            ..ValidationRules::none()
        };
        // Thai text is multi-byte; limits are in characters
        assert!(rules.validate_string("ปกติ", "สภาพ").is_ok());
        assert!(rules.validate_string("ผิดปกติ", "สภาพ").is_err());
    }

    #[test]
    fn test_numeric_bounds() {
        let rules = ValidationRules::numeric(Some(0.0), Some(100.0));
        assert!(rules.validate_string("42.5", "kV").is_ok());
        assert_eq!(
            rules.validate_string("abc", "kV"),
            Err("kV ต้องเป็นตัวเลข".to_string())
        );
        assert!(rules.validate_string("-1", "kV").is_err());
        assert!(rules.validate_string("100.1", "kV").is_err());
        assert!(rules.validate_string("NaN", "kV").is_err());
    }
}
