use super::repository;
use contracts::domain::a002_inspection_item::aggregate::TEST_TYPE_KEY;
use contracts::domain::a002_inspection_item::{InspectionItem, InspectionItemDto, InspectionQuery};
use contracts::domain::a003_inspection_category::CategoryKind;
use contracts::shared::form_schema::FieldErrors;
use contracts::system::permissions::Permission;

use crate::shared::error::{AppError, AppResult};
use crate::shared::state::AppState;

/// Permission needed to record results of a category
pub fn write_permission(test_type: &str) -> Option<Permission> {
    CategoryKind::of(test_type).map(|kind| kind.write_permission())
}

/// Validate and store a new record
pub async fn create(state: &AppState, dto: InspectionItemDto) -> AppResult<InspectionItem> {
    let normalized = dto.validated()?;
    let saved =
        repository::insert(&state.inspections, InspectionItem::new_for_insert(&normalized)).await;
    tracing::info!(
        "Recorded {} for {} (id {})",
        saved.test_type,
        saved.egat_sn,
        saved.id
    );
    Ok(saved)
}

/// Replace a record as a whole. The test type of a record is fixed.
pub async fn update(state: &AppState, id: i64, dto: InspectionItemDto) -> AppResult<InspectionItem> {
    if dto.id.is_some_and(|dto_id| dto_id != id) {
        return Err(AppError::BadRequest("รหัสรายการไม่ตรงกัน".to_string()));
    }

    let mut aggregate = repository::get_by_id(&state.inspections, id)
        .await
        .ok_or_else(|| not_found(id))?;
    if aggregate.test_type != dto.test_type {
        let mut errors = FieldErrors::default();
        errors.insert(
            TEST_TYPE_KEY,
            "ไม่สามารถเปลี่ยนประเภทการทดสอบของรายการที่บันทึกแล้ว".to_string(),
        );
        return Err(AppError::Validation(errors));
    }

    let normalized = dto.validated()?;
    aggregate.update(&normalized);

    Ok(repository::update(&state.inspections, aggregate).await?)
}

pub async fn delete(state: &AppState, id: i64) -> bool {
    repository::delete(&state.inspections, id).await
}

pub async fn get_by_id(state: &AppState, id: i64) -> AppResult<InspectionItem> {
    repository::get_by_id(&state.inspections, id)
        .await
        .ok_or_else(|| not_found(id))
}

pub async fn list(state: &AppState, query: &InspectionQuery) -> Vec<InspectionItem> {
    repository::list(&state.inspections, query).await
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("ไม่พบรายการตรวจสอบ {}", id))
}
