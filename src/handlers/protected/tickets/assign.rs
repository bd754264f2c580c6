use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use super::load_visible;
use crate::api::AssignRequest;
use crate::auth::Action;
use crate::database::models::Ticket;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::recommender;
use crate::services::technicians_with_workload;
use crate::state::AppState;
use crate::types::Operation;

/// PUT /api/tickets/:id/assign - `{technicianId}` or `{auto: true}`
pub async fn assign(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<AssignRequest>,
) -> ApiResult<Ticket> {
    user.require(Action::AssignTicket)?;
    let before = load_visible(&state, &user, id).await?;

    let technician_id = match (req.technician_id, req.auto) {
        (Some(technician_id), false) => {
            let technician = state
                .store
                .get_technician(technician_id)
                .await?
                .ok_or_else(|| ApiError::not_found(format!("Technician {} not found", technician_id)))?;
            if technician.company_id != before.company_id {
                return Err(ApiError::invalid_field(
                    "technicianId",
                    "Technician belongs to a different company",
                ));
            }
            technician.id
        }
        (None, true) => {
            let candidates = technicians_with_workload(state.store.as_ref(), Some(before.company_id)).await?;
            let best = recommender::suggest(&before, &candidates)
                .into_iter()
                .next()
                .ok_or_else(|| ApiError::conflict("No technician available for this ticket"))?;
            tracing::info!(
                "Auto-assigning ticket {} to {} (score {})",
                before.id,
                best.technician_name,
                best.score
            );
            best.technician_id
        }
        _ => {
            return Err(ApiError::invalid_field(
                "technicianId",
                "Provide either technicianId or auto: true",
            ))
        }
    };

    let mut ticket = before.clone();
    ticket.technician = Some(technician_id);

    let ticket = state.pipeline.run(Operation::Assign, user.actor(), Some(before), ticket).await?;
    Ok(ApiResponse::success(ticket))
}
