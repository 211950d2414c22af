use contracts::domain::a002_inspection_item::{InspectionItem, InspectionQuery};

use crate::shared::data::memory_store::StoreError;
use crate::shared::state::Store;

pub async fn list(store: &Store<InspectionItem>, query: &InspectionQuery) -> Vec<InspectionItem> {
    store.read().await.filter(|item| query.matches(item))
}

pub async fn get_by_id(store: &Store<InspectionItem>, id: i64) -> Option<InspectionItem> {
    store.read().await.get(&id)
}

pub async fn insert(store: &Store<InspectionItem>, aggregate: InspectionItem) -> InspectionItem {
    store.write().await.add(aggregate)
}

pub async fn update(
    store: &Store<InspectionItem>,
    aggregate: InspectionItem,
) -> Result<InspectionItem, StoreError> {
    let id = aggregate.id;
    store.write().await.update(&id, aggregate)
}

pub async fn delete(store: &Store<InspectionItem>, id: i64) -> bool {
    store.write().await.remove(&id)
}
