use contracts::domain::a002_inspection_item::{InspectionItem, InspectionItemDto, InspectionQuery};
use contracts::shared::api_error::ApiError;

use crate::shared::api_utils::{delete, get_json, post_json, put_json};

/// Query string of a list filter, empty when nothing is filtered
pub fn query_string(query: &InspectionQuery) -> String {
    let params: Vec<String> = [("test_type", &query.test_type), ("egat_sn", &query.egat_sn)]
        .into_iter()
        .filter_map(|(key, value)| {
            let value = value.as_deref().map(str::trim).filter(|v| !v.is_empty())?;
            Some(format!("{}={}", key, urlencoding::encode(value)))
        })
        .collect();

    if params.is_empty() {
        String::new()
    } else {
        format!("?{}", params.join("&"))
    }
}

pub async fn fetch_list(query: &InspectionQuery) -> Result<Vec<InspectionItem>, String> {
    get_json(&format!("/api/inspections{}", query_string(query)))
        .await
        .map_err(|e| e.message)
}

/// Create or replace, depending on `dto.id`
pub async fn save(dto: &InspectionItemDto) -> Result<InspectionItem, ApiError> {
    match dto.id {
        Some(id) => put_json(&format!("/api/inspections/{}", id), dto).await,
        None => post_json("/api/inspections", dto).await,
    }
}

pub async fn delete_by_id(id: i64) -> Result<(), String> {
    delete(&format!("/api/inspections/{}", id))
        .await
        .map_err(|e| e.message)
}
