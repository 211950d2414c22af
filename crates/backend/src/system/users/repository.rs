use chrono::Utc;
use contracts::system::users::User;

use crate::shared::data::memory_store::{not_found, MemoryStore, StoreError};
use crate::shared::state::Store;

pub async fn list_all(store: &Store<User>) -> Vec<User> {
    store.read().await.list()
}

pub async fn get_by_id(store: &Store<User>, id: &str) -> Option<User> {
    store.read().await.get(&id.to_string())
}

/// Lookup by employee number
pub async fn get_by_login(store: &Store<User>, login: &str) -> Option<User> {
    store.read().await.find(|u| u.login == login)
}

pub async fn insert(store: &Store<User>, user: User) -> User {
    store.write().await.add(user)
}

/// Insert after `check` passed, under one write lock
pub async fn insert_checked<E>(
    store: &Store<User>,
    user: User,
    check: impl FnOnce(&MemoryStore<User>, &User) -> Result<(), E>,
) -> Result<User, E> {
    store.write().await.add_checked(user, check)
}

/// Replace after `check` passed, under one write lock
pub async fn update_checked<E: From<StoreError>>(
    store: &Store<User>,
    user: User,
    check: impl FnOnce(&MemoryStore<User>, &User) -> Result<(), E>,
) -> Result<User, E> {
    let id = user.id.clone();
    store.write().await.update_checked(&id, user, check)
}

pub async fn delete(store: &Store<User>, id: &str) -> bool {
    store.write().await.remove(&id.to_string())
}

/// Stamp a successful login
pub async fn update_last_login(store: &Store<User>, id: &str) -> Result<User, StoreError> {
    let mut guard = store.write().await;
    let id = id.to_string();
    let mut user = guard.get(&id).ok_or_else(|| not_found::<User>(&id))?;
    user.last_login_at = Some(Utc::now());
    guard.update(&id, user)
}
