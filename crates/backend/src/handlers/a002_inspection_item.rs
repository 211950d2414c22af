use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a002_inspection_item::{InspectionItem, InspectionItemDto, InspectionQuery};
use contracts::system::permissions::Permission;

use crate::domain::a002_inspection_item::service;
use crate::shared::error::{AppError, AppResult};
use crate::shared::state::AppState;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/inspections?test_type=..&egat_sn=..
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<InspectionQuery>,
) -> Json<Vec<InspectionItem>> {
    Json(service::list(&state, &query).await)
}

/// GET /api/inspections/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<InspectionItem>> {
    service::get_by_id(&state, id).await.map(Json)
}

/// POST /api/inspections
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(dto): Json<InspectionItemDto>,
) -> AppResult<(StatusCode, Json<InspectionItem>)> {
    require_recording(&user, &dto.test_type)?;
    let created = service::create(&state, dto).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/inspections/:id
///
/// Needs `edit_records` plus the write permission of the stored record's
/// category.
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(dto): Json<InspectionItemDto>,
) -> AppResult<Json<InspectionItem>> {
    user.require(Permission::EditRecords)?;
    let existing = service::get_by_id(&state, id).await?;
    require_recording(&user, &existing.test_type)?;
    require_recording(&user, &dto.test_type)?;
    service::update(&state, id, dto).await.map(Json)
}

/// DELETE /api/inspections/:id
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    user.require(Permission::DeleteRecords)?;
    if service::delete(&state, id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("ไม่พบรายการตรวจสอบ {}", id)))
    }
}

/// Unknown test types fall through to validation, which reports them
fn require_recording(user: &CurrentUser, test_type: &str) -> AppResult<()> {
    match service::write_permission(test_type) {
        Some(permission) => user.require(permission),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::state::test_support;
    use contracts::system::auth::TokenClaims;
    use contracts::system::permissions::PermissionSet;
    use std::collections::BTreeMap;

    fn user(permissions: &[Permission]) -> CurrentUser {
        CurrentUser(TokenClaims {
            sub: "u".into(),
            employee_no: "22222222".into(),
            permissions: permissions.iter().copied().collect::<PermissionSet>(),
            exp: 0,
            iat: 0,
            jti: "j".into(),
        })
    }

    fn dto(test_type: &str, fields: &[(&str, &str)]) -> InspectionItemDto {
        InspectionItemDto {
            id: None,
            transformer_name: "KT1A".into(),
            egat_sn: "EGAT-1".into(),
            test_type: test_type.into(),
            test_date: "2024-03-02".into(),
            test_time: "13:45".into(),
            inspector: "สมชาย".into(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn oil_dto() -> InspectionItemDto {
        dto(
            "oil_aging",
            &[
                ("ผลการประเมิน", "ปกติ"),
                ("วันที่เก็บตัวอย่าง", "2024-03-01"),
                ("แรงดันเบรกดาวน์ (kV)", "62"),
            ],
        )
    }

    #[tokio::test]
    async fn test_visual_inspector_cannot_overwrite_oil_test() {
        let state = test_support::state();
        let oil = service::create(&state, oil_dto()).await.unwrap();

        let visual = user(&[Permission::RecordVisualInspections, Permission::EditRecords]);
        let result = update(
            State(state.clone()),
            visual,
            Path(oil.id),
            Json(dto("bushing", &[("สภาพ", "ปกติ")])),
        )
        .await;
        assert!(matches!(result, Err(AppError::Forbidden)));

        let stored = service::get_by_id(&state, oil.id).await.unwrap();
        assert_eq!(stored.test_type, "oil_aging");
    }

    #[tokio::test]
    async fn test_oil_tester_edits_oil_test() {
        let state = test_support::state();
        let oil = service::create(&state, oil_dto()).await.unwrap();

        let tester = user(&[Permission::RecordOilTests, Permission::EditRecords]);
        let mut changed = oil_dto();
        changed.inspector = "สมหญิง".into();
        let Json(updated) = update(State(state.clone()), tester, Path(oil.id), Json(changed))
            .await
            .unwrap();
        assert_eq!(updated.inspector, "สมหญิง");

        let no_edit = user(&[Permission::RecordOilTests]);
        let result = update(State(state), no_edit, Path(oil.id), Json(oil_dto())).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }
}
