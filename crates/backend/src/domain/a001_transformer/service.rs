use super::repository;
use contracts::domain::a001_transformer::aggregate::fields;
use contracts::domain::a001_transformer::{serial_key, Transformer, TransformerDto};
use contracts::shared::form_schema::FieldErrors;

use crate::shared::data::memory_store::MemoryStore;
use crate::shared::error::{AppError, AppResult};
use crate::shared::state::AppState;

/// Create a new transformer
pub async fn create(state: &AppState, dto: TransformerDto) -> AppResult<Transformer> {
    let aggregate = Transformer::new_for_insert(&dto);
    aggregate.validate()?;

    let saved = repository::insert_checked(&state.transformers, aggregate, unique_serial).await?;
    tracing::info!("Created transformer {} ({})", saved.egat_sn, saved.id);
    Ok(saved)
}

/// Replace an existing transformer
pub async fn update(state: &AppState, id: &str, dto: TransformerDto) -> AppResult<Transformer> {
    let mut aggregate = repository::get_by_id(&state.transformers, id)
        .await
        .ok_or_else(|| not_found(id))?;

    aggregate.update(&dto);
    aggregate.validate()?;

    repository::update_checked(&state.transformers, aggregate, unique_serial).await
}

pub async fn delete(state: &AppState, id: &str) -> bool {
    repository::delete(&state.transformers, id).await
}

pub async fn get_by_id(state: &AppState, id: &str) -> AppResult<Transformer> {
    repository::get_by_id(&state.transformers, id)
        .await
        .ok_or_else(|| not_found(id))
}

pub async fn list_all(state: &AppState) -> Vec<Transformer> {
    repository::list_all(&state.transformers).await
}

/// Serials are unique in the inventory, compared by [`serial_key`]
fn unique_serial(store: &MemoryStore<Transformer>, aggregate: &Transformer) -> AppResult<()> {
    let key = serial_key(&aggregate.egat_sn);
    match store.find(|t| t.id != aggregate.id && serial_key(&t.egat_sn) == key) {
        Some(_) => {
            let mut errors = FieldErrors::default();
            errors.insert(
                fields::EGAT_SN,
                format!("EGAT S/N {} มีอยู่ในทะเบียนแล้ว", aggregate.egat_sn),
            );
            Err(AppError::Validation(errors))
        }
        _ => Ok(()),
    }
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("ไม่พบหม้อแปลง {}", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::state::test_support;
    use contracts::domain::a001_transformer::Importance;

    fn dto(name: &str, egat_sn: &str) -> TransformerDto {
        TransformerDto {
            id: None,
            name: name.into(),
            egat_sn: egat_sn.into(),
            substation: "บางกะปิ".into(),
            manufacturer: "Siemens".into(),
            rated_mva: Some(50.0),
            voltage_kv: "115/22".into(),
            importance: Importance::Normal,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let state = test_support::state();
        let created = create(&state, dto("KT1A", "EGAT-1")).await.unwrap();
        assert!(!created.id.is_empty());

        let loaded = get_by_id(&state, &created.id).await.unwrap();
        assert_eq!(loaded, created);
    }

    #[tokio::test]
    async fn test_duplicate_serial_is_a_field_error() {
        let state = test_support::state();
        create(&state, dto("KT1A", "EGAT-1")).await.unwrap();

        match create(&state, dto("KT1B", "egat-1")).await {
            Err(AppError::Validation(errors)) => assert!(errors.get(fields::EGAT_SN).is_some()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_concurrent_creates_keep_serials_unique() {
        let state = test_support::state();
        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let state = state.clone();
                tokio::spawn(async move { create(&state, dto(&format!("KT{}", i), "EGAT-9")).await })
            })
            .collect();

        let mut created = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(list_all(&state).await.len(), 1);
    }

    #[tokio::test]
    async fn test_update_cannot_take_another_serial() {
        let state = test_support::state();
        create(&state, dto("KT1A", "EGAT-1")).await.unwrap();
        let other = create(&state, dto("KT1B", "EGAT-2")).await.unwrap();

        assert!(matches!(
            update(&state, &other.id, dto("KT1B", " egat-1 ")).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(get_by_id(&state, &other.id).await.unwrap().egat_sn, "EGAT-2");
    }

    #[tokio::test]
    async fn test_update_keeps_serial_of_itself() {
        let state = test_support::state();
        let created = create(&state, dto("KT1A", "EGAT-1")).await.unwrap();

        let mut changed = dto("KT1A-new", "EGAT-1");
        changed.importance = Importance::Critical;
        let updated = update(&state, &created.id, changed).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "KT1A-new");
        assert_eq!(updated.importance, Importance::Critical);
        assert_eq!(list_all(&state).await.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_and_missing() {
        let state = test_support::state();
        assert!(matches!(
            create(&state, dto("", "EGAT-1")).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            update(&state, "nope", dto("A", "B")).await,
            Err(AppError::NotFound(_))
        ));
        assert!(!delete(&state, "nope").await);
    }
}
