use axum::extract::State;
use axum::Json;
use contracts::projections::p900_inspection_summary::InspectionSummaryResponse;
use contracts::system::permissions::Permission;

use crate::projections::p900_inspection_summary::service;
use crate::shared::error::AppResult;
use crate::shared::state::AppState;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/summary
pub async fn get_summary(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<InspectionSummaryResponse>> {
    user.require(Permission::ViewCalculations)?;
    Ok(Json(service::get_summary(&state).await))
}
