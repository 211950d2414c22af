use contracts::domain::a001_transformer::Transformer;

use crate::shared::data::memory_store::{MemoryStore, StoreError};
use crate::shared::state::Store;

pub async fn list_all(store: &Store<Transformer>) -> Vec<Transformer> {
    store.read().await.list()
}

pub async fn get_by_id(store: &Store<Transformer>, id: &str) -> Option<Transformer> {
    store.read().await.get(&id.to_string())
}

/// Insert after `check` passed, under one write lock
pub async fn insert_checked<E>(
    store: &Store<Transformer>,
    aggregate: Transformer,
    check: impl FnOnce(&MemoryStore<Transformer>, &Transformer) -> Result<(), E>,
) -> Result<Transformer, E> {
    store.write().await.add_checked(aggregate, check)
}

/// Replace after `check` passed, under one write lock
pub async fn update_checked<E: From<StoreError>>(
    store: &Store<Transformer>,
    aggregate: Transformer,
    check: impl FnOnce(&MemoryStore<Transformer>, &Transformer) -> Result<(), E>,
) -> Result<Transformer, E> {
    let id = aggregate.id.clone();
    store.write().await.update_checked(&id, aggregate, check)
}

pub async fn delete(store: &Store<Transformer>, id: &str) -> bool {
    store.write().await.remove(&id.to_string())
}
