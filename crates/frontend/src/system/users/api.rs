use contracts::shared::api_error::ApiError;
use contracts::system::users::{CreateUserDto, UpdateUserDto, User};

use crate::shared::api_utils::{delete, get_json, post_json, put_json};

/// Fetch all users
pub async fn fetch_users() -> Result<Vec<User>, String> {
    get_json("/api/system/users").await.map_err(|e| e.message)
}

/// Create new user
pub async fn create_user(dto: CreateUserDto) -> Result<User, ApiError> {
    post_json("/api/system/users", &dto).await
}

/// Update name and permissions of a user
pub async fn update_user(dto: UpdateUserDto) -> Result<User, ApiError> {
    put_json(&format!("/api/system/users/{}", dto.id), &dto).await
}

/// Delete user
pub async fn delete_user(id: &str) -> Result<(), String> {
    delete(&format!("/api/system/users/{}", id))
        .await
        .map_err(|e| e.message)
}
