use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::shared::state::AppState;
use crate::system::auth::middleware::{require_auth, require_manage_users};
use crate::{handlers, system};

/// Application routes
pub fn configure_routes(state: AppState) -> Router {
    // ========================================
    // PUBLIC
    // ========================================
    let public = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/system/auth/login", post(system::handlers::auth::login));

    // ========================================
    // SYSTEM USERS (manage_users only)
    // ========================================
    let users = Router::new()
        .route(
            "/api/system/users",
            get(system::handlers::users::list).post(system::handlers::users::create),
        )
        .route(
            "/api/system/users/:id",
            get(system::handlers::users::get_by_id)
                .put(system::handlers::users::update)
                .delete(system::handlers::users::delete),
        )
        .route_layer(middleware::from_fn(require_manage_users));

    // ========================================
    // AUTHENTICATED
    // ========================================
    let protected = Router::new()
        .route(
            "/api/system/auth/logout",
            post(system::handlers::auth::logout),
        )
        .route(
            "/api/system/auth/me",
            get(system::handlers::auth::current_user),
        )
        // Inspection categories
        .route(
            "/api/categories",
            get(handlers::a003_inspection_category::list_all),
        )
        .route(
            "/api/categories/:id",
            get(handlers::a003_inspection_category::get_by_id),
        )
        // A001 Transformers
        .route(
            "/api/transformers",
            get(handlers::a001_transformer::list_all).post(handlers::a001_transformer::create),
        )
        .route(
            "/api/transformers/:id",
            get(handlers::a001_transformer::get_by_id)
                .put(handlers::a001_transformer::update)
                .delete(handlers::a001_transformer::delete),
        )
        // A002 Inspection records
        .route(
            "/api/inspections",
            get(handlers::a002_inspection_item::list).post(handlers::a002_inspection_item::create),
        )
        .route(
            "/api/inspections/:id",
            get(handlers::a002_inspection_item::get_by_id)
                .put(handlers::a002_inspection_item::update)
                .delete(handlers::a002_inspection_item::delete),
        )
        // P900 Summary
        .route(
            "/api/summary",
            get(handlers::p900_inspection_summary::get_summary),
        )
        .merge(users)
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public.merge(protected).with_state(state)
}
