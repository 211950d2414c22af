use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use contracts::system::auth::TokenClaims;
use contracts::system::permissions::Permission;

use super::service;
use crate::shared::error::AppError;
use crate::shared::state::AppState;

/// Raw bearer token of the request, kept for logout
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

/// Middleware that requires a valid JWT of a live session.
/// The attached claims carry the user's current permissions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
        .ok_or_else(AppError::unauthenticated)?;

    let claims = service::authenticate(&state, &token).await?;

    req.extensions_mut().insert(claims);
    req.extensions_mut().insert(BearerToken(token));

    Ok(next.run(req).await)
}

/// Middleware that requires the `manage_users` permission.
/// Must run after [`require_auth`].
pub async fn require_manage_users(req: Request<Body>, next: Next) -> Result<Response, AppError> {
    let claims = req
        .extensions()
        .get::<TokenClaims>()
        .ok_or_else(AppError::unauthenticated)?;

    if !claims.has(Permission::ManageUsers) {
        return Err(AppError::Forbidden);
    }

    Ok(next.run(req).await)
}
