use axum::extract::Path;
use axum::Json;
use contracts::shared::form_schema::Category;

use crate::domain::a003_inspection_category::service;
use crate::shared::error::AppResult;

/// GET /api/categories
pub async fn list_all() -> Json<Vec<Category>> {
    Json(service::list_all())
}

/// GET /api/categories/:id
pub async fn get_by_id(Path(id): Path<String>) -> AppResult<Json<Category>> {
    service::get_by_id(&id).map(Json)
}
