use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use contracts::system::users::{CreateUserDto, UpdateUserDto, User};

use crate::shared::error::{AppError, AppResult};
use crate::shared::state::AppState;
use crate::system::auth::extractor::CurrentUser;
use crate::system::users::service;

/// GET /api/system/users
pub async fn list(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(service::list_all(&state).await)
}

/// GET /api/system/users/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    service::get_by_id(&state, &id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("ไม่พบผู้ใช้ {}", id)))
}

/// POST /api/system/users
pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<CreateUserDto>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = service::create(&state, dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /api/system/users/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(dto): Json<UpdateUserDto>,
) -> AppResult<Json<User>> {
    service::update(&state, &id, dto).await.map(Json)
}

/// DELETE /api/system/users/:id
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if service::delete(&state, &id, &claims.sub).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("ไม่พบผู้ใช้ {}", id)))
    }
}
