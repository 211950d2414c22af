use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a001_transformer::{Transformer, TransformerDto};
use contracts::system::permissions::Permission;

use crate::domain::a001_transformer;
use crate::shared::error::{AppError, AppResult};
use crate::shared::state::AppState;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/transformers
pub async fn list_all(State(state): State<AppState>) -> Json<Vec<Transformer>> {
    Json(a001_transformer::service::list_all(&state).await)
}

/// GET /api/transformers/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Transformer>> {
    a001_transformer::service::get_by_id(&state, &id)
        .await
        .map(Json)
}

/// POST /api/transformers
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(dto): Json<TransformerDto>,
) -> AppResult<(StatusCode, Json<Transformer>)> {
    user.require(Permission::ManageTransformers)?;
    let created = a001_transformer::service::create(&state, dto).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/transformers/:id
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<TransformerDto>,
) -> AppResult<Json<Transformer>> {
    user.require(Permission::ManageTransformers)?;
    user.require(Permission::EditRecords)?;
    a001_transformer::service::update(&state, &id, dto)
        .await
        .map(Json)
}

/// DELETE /api/transformers/:id
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    user.require(Permission::ManageTransformers)?;
    user.require(Permission::DeleteRecords)?;
    if a001_transformer::service::delete(&state, &id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("ไม่พบหม้อแปลง {}", id)))
    }
}
