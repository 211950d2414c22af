use contracts::projections::p900_inspection_summary::InspectionSummaryResponse;

use crate::shared::api_utils::get_json;

pub async fn fetch_summary() -> Result<InspectionSummaryResponse, String> {
    get_json("/api/summary").await.map_err(|e| e.message)
}
