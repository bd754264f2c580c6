use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use super::load_visible;
use crate::api::TicketPatch;
use crate::auth::{Action, Role};
use crate::database::models::Ticket;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::types::Operation;

/// PATCH /api/tickets/:id - workflow update. Technicians may only touch
/// tickets assigned to them.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(patch): Json<TicketPatch>,
) -> ApiResult<Ticket> {
    user.require(Action::WorkTicket)?;
    if patch.is_empty() {
        return Err(ApiError::bad_request("Nothing to update"));
    }

    let before = load_visible(&state, &user, id).await?;
    if user.role == Role::Technician && (before.technician.is_none() || before.technician != user.technician_id) {
        return Err(ApiError::forbidden("Ticket is not assigned to you"));
    }

    let mut ticket = before.clone();
    if let Some(status) = patch.status {
        ticket.status = status;
    }
    if let Some(priority) = patch.priority {
        ticket.priority = priority;
    }
    if let Some(description) = patch.description {
        ticket.description = description;
    }

    let ticket = state.pipeline.run(Operation::Update, user.actor(), Some(before), ticket).await?;
    Ok(ApiResponse::success(ticket))
}
