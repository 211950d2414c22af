use contracts::system::permissions::Permission;
use contracts::system::users::{CreateUserDto, UpdateUserDto, User};

use super::repository;
use crate::shared::data::memory_store::MemoryStore;
use crate::shared::error::{AppError, AppResult};
use crate::shared::state::AppState;

/// Create a new user
pub async fn create(state: &AppState, dto: CreateUserDto) -> AppResult<User> {
    dto.validate()?;

    let user = User::new_for_insert(&dto);
    let user = repository::insert_checked(&state.users, user, |store, user| {
        match store.find(|u| u.login == user.login) {
            Some(_) => Err(AppError::Conflict(format!(
                "รหัสพนักงาน {} มีอยู่ในระบบแล้ว",
                user.login
            ))),
            None => Ok(()),
        }
    })
    .await?;
    tracing::info!("Created user {} ({})", user.login, user.id);
    Ok(user)
}

/// Update names and permissions of a user
pub async fn update(state: &AppState, id: &str, dto: UpdateUserDto) -> AppResult<User> {
    if !dto.id.is_empty() && dto.id != id {
        return Err(AppError::BadRequest("รหัสผู้ใช้ไม่ตรงกัน".to_string()));
    }
    dto.validate()?;

    let mut user = repository::get_by_id(&state.users, id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("ไม่พบผู้ใช้ {}", id)))?;

    user.update(&dto);
    let user = repository::update_checked(&state.users, user, keeps_an_admin).await?;
    tracing::info!("Updated user {} ({})", user.login, user.id);
    Ok(user)
}

/// At least one user must keep `manage_users`
fn keeps_an_admin(store: &MemoryStore<User>, updated: &User) -> AppResult<()> {
    let is_admin = |u: &User| u.permissions.contains(Permission::ManageUsers);
    let was_admin = store.get(&updated.id).is_some_and(|u| is_admin(&u));
    let admins = store.filter(|u| is_admin(u)).len();

    if was_admin && !is_admin(updated) && admins <= 1 {
        return Err(AppError::Conflict(
            "ต้องมีผู้ใช้ที่มีสิทธิ์จัดการผู้ใช้งานอย่างน้อยหนึ่งคน".to_string(),
        ));
    }
    Ok(())
}

/// Delete a user and end their sessions. Users cannot delete themselves.
pub async fn delete(state: &AppState, id: &str, requester_id: &str) -> AppResult<bool> {
    if id == requester_id {
        return Err(AppError::Conflict("ไม่สามารถลบบัญชีของตนเองได้".to_string()));
    }

    let deleted = repository::delete(&state.users, id).await;
    if deleted {
        let revoked = state.sessions.revoke_user(id).await;
        tracing::info!("Deleted user {}, revoked {} session(s)", id, revoked);
    }
    Ok(deleted)
}

pub async fn get_by_id(state: &AppState, id: &str) -> Option<User> {
    repository::get_by_id(&state.users, id).await
}

pub async fn list_all(state: &AppState) -> Vec<User> {
    repository::list_all(&state.users).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::state::test_support;
    use contracts::system::permissions::PermissionSet;

    fn create_dto(login: &str, permissions: PermissionSet) -> CreateUserDto {
        CreateUserDto {
            login: login.into(),
            firstname: "สมชาย".into(),
            lastname: "ใจดี".into(),
            permissions,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_login() {
        let state = test_support::state();
        create(&state, create_dto("11111111", PermissionSet::empty()))
            .await
            .unwrap();

        let err = create(&state, create_dto("11111111", PermissionSet::empty()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(list_all(&state).await.len(), 1);
    }

    #[tokio::test]
    async fn test_create_validates() {
        let state = test_support::state();
        let err = create(&state, create_dto("abc", PermissionSet::empty()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_last_admin_keeps_manage_users() {
        let state = test_support::state();
        let admin = create(&state, create_dto("11111111", PermissionSet::all()))
            .await
            .unwrap();

        let demote = UpdateUserDto {
            id: admin.id.clone(),
            firstname: "สมชาย".into(),
            lastname: "ใจดี".into(),
            permissions: PermissionSet::empty(),
        };
        let err = update(&state, &admin.id, demote.clone()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        create(&state, create_dto("22222222", PermissionSet::all()))
            .await
            .unwrap();
        let updated = update(&state, &admin.id, demote).await.unwrap();
        assert!(updated.permissions.is_empty());
        assert_eq!(updated.metadata.version, 1);
    }

    #[tokio::test]
    async fn test_concurrent_demotions_keep_one_admin() {
        let state = test_support::state();
        let a = create(&state, create_dto("11111111", PermissionSet::all()))
            .await
            .unwrap();
        let b = create(&state, create_dto("22222222", PermissionSet::all()))
            .await
            .unwrap();

        let demote = |id: String| {
            let state = state.clone();
            tokio::spawn(async move {
                let dto = UpdateUserDto {
                    id: id.clone(),
                    firstname: "สมชาย".into(),
                    lastname: "ใจดี".into(),
                    permissions: PermissionSet::empty(),
                };
                update(&state, &id, dto).await
            })
        };
        let (ra, rb) = (demote(a.id.clone()), demote(b.id.clone()));
        let results = [ra.await.unwrap(), rb.await.unwrap()];

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let admins = list_all(&state)
            .await
            .into_iter()
            .filter(|u| u.permissions.contains(Permission::ManageUsers))
            .count();
        assert_eq!(admins, 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let state = test_support::state();
        let a = create(&state, create_dto("11111111", PermissionSet::all()))
            .await
            .unwrap();
        let b = create(&state, create_dto("22222222", PermissionSet::empty()))
            .await
            .unwrap();

        assert!(matches!(
            delete(&state, &a.id, &a.id).await,
            Err(AppError::Conflict(_))
        ));
        assert!(delete(&state, &b.id, &a.id).await.unwrap());
        assert!(!delete(&state, &b.id, &a.id).await.unwrap());
        assert!(get_by_id(&state, &b.id).await.is_none());
    }
}
