use axum::{extract::State, http::StatusCode, Json};
use contracts::system::auth::{LoginRequest, LoginResponse, SessionInfo};

use crate::shared::error::AppResult;
use crate::shared::state::AppState;
use crate::system::auth::extractor::CurrentUser;
use crate::system::auth::middleware::BearerToken;
use crate::system::auth::service;

/// Login handler
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    service::login(&state, request).await.map(Json)
}

/// Logout handler (protected by middleware)
pub async fn logout(State(state): State<AppState>, BearerToken(token): BearerToken) -> StatusCode {
    service::logout(&state, &token).await;
    StatusCode::NO_CONTENT
}

/// Get current session handler (protected by middleware)
pub async fn current_user(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    CurrentUser(claims): CurrentUser,
) -> AppResult<Json<SessionInfo>> {
    service::current_session(&state, &token, &claims)
        .await
        .map(Json)
}
