use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::shared::calculation::{percentage, ConditionBand};

/// Summary row for one transformer serial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformerSummaryDto {
    pub egat_sn: String,
    /// Name from the most recent record
    pub transformer_name: String,
    pub record_count: u32,
    /// Record count per category id
    pub counts_by_type: BTreeMap<String, u32>,
    /// "YYYY-MM-DD"
    pub latest_test_date: Option<String>,
    /// Answered condition fields
    pub answered_count: u32,
    /// Condition fields answered "ปกติ"
    pub normal_count: u32,
    pub normal_percent: Option<f64>,
    pub band: Option<ConditionBand>,
}

impl TransformerSummaryDto {
    pub fn new(egat_sn: impl Into<String>) -> Self {
        Self {
            egat_sn: egat_sn.into(),
            transformer_name: String::new(),
            record_count: 0,
            counts_by_type: BTreeMap::new(),
            latest_test_date: None,
            answered_count: 0,
            normal_count: 0,
            normal_percent: None,
            band: None,
        }
    }

    /// Recompute the percentage and band from the counters
    pub fn finish(&mut self) {
        self.normal_percent = percentage(self.normal_count, self.answered_count);
        self.band = self.normal_percent.map(ConditionBand::from_percent);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionSummaryResponse {
    pub rows: Vec<TransformerSummaryDto>,
    pub total_records: u32,
    pub overall_percent: Option<f64>,
    pub overall_band: Option<ConditionBand>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_without_answers_has_no_band() {
        let mut row = TransformerSummaryDto::new("EGAT-1");
        row.finish();
        assert_eq!(row.normal_percent, None);
        assert_eq!(row.band, None);

        row.answered_count = 20;
        row.normal_count = 17;
        row.finish();
        assert_eq!(row.normal_percent, Some(85.0));
        assert_eq!(row.band, Some(ConditionBand::Good));
    }
}
