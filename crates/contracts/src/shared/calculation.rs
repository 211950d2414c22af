//! Percentage and threshold helpers for the calculation result pages

use serde::{Deserialize, Serialize};

/// Lower bound (inclusive) of the "good" band, in percent
pub const GOOD_THRESHOLD: f64 = 85.0;
/// Lower bound (inclusive) of the "fair" band, in percent
pub const FAIR_THRESHOLD: f64 = 60.0;

/// `part / total` in percent, rounded to two decimals.
/// `None` when there is nothing to measure.
pub fn percentage(part: u32, total: u32) -> Option<f64> {
    if total == 0 {
        return None;
    }
    let value = f64::from(part) * 100.0 / f64::from(total);
    Some((value * 100.0).round() / 100.0)
}

/// Condition class derived from a percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionBand {
    Good,
    Fair,
    Poor,
}

impl ConditionBand {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= GOOD_THRESHOLD {
            Self::Good
        } else if percent >= FAIR_THRESHOLD {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "ดี",
            Self::Fair => "พอใช้",
            Self::Poor => "ต้องปรับปรุง",
        }
    }

    /// CSS modifier used by the summary table
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Good => "band--good",
            Self::Fair => "band--fair",
            Self::Poor => "band--poor",
        }
    }
}
