use contracts::domain::a001_transformer::{Transformer, TransformerDto};
use contracts::shared::api_error::ApiError;

use crate::shared::api_utils::{delete, get_json, post_json, put_json};

pub async fn fetch_all() -> Result<Vec<Transformer>, String> {
    get_json("/api/transformers").await.map_err(|e| e.message)
}

/// Create or replace, depending on `dto.id`
pub async fn save(dto: &TransformerDto) -> Result<Transformer, ApiError> {
    match &dto.id {
        Some(id) => put_json(&format!("/api/transformers/{}", id), dto).await,
        None => post_json("/api/transformers", dto).await,
    }
}

pub async fn delete_by_id(id: &str) -> Result<(), String> {
    delete(&format!("/api/transformers/{}", id))
        .await
        .map_err(|e| e.message)
}
