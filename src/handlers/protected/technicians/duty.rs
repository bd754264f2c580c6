use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::api::DutyRequest;
use crate::auth::Action;
use crate::database::models::Technician;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// PUT /api/technicians/:id/duty - the technician themself or an admin
pub async fn update_duty(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<DutyRequest>,
) -> ApiResult<Technician> {
    let mut technician = state
        .store
        .get_technician(id)
        .await?
        .filter(|t| user.can_see(t.company_id))
        .ok_or_else(|| ApiError::not_found(format!("Technician {} not found", id)))?;

    if user.technician_id != Some(id) {
        user.require(Action::ManageTechnicians)?;
    }

    technician.set_duty_status(req.duty_status);
    state.store.save_technician(&technician).await?;

    tracing::info!("{} is now {}", technician.name, technician.duty_status);
    Ok(ApiResponse::success(technician))
}
