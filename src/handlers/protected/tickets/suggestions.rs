use axum::{
    extract::{Path, State},
    Extension,
};
use uuid::Uuid;

use super::load_visible;
use crate::auth::Action;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::recommender::{self, TicketSuggestions};
use crate::services::technicians_with_workload;
use crate::state::AppState;

/// GET /api/tickets/:id/suggestions - ranked technicians for one ticket
pub async fn suggestions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<TicketSuggestions> {
    user.require(Action::AssignTicket)?;
    let ticket = load_visible(&state, &user, id).await?;

    let technicians = technicians_with_workload(state.store.as_ref(), Some(ticket.company_id)).await?;
    let suggestions = recommender::suggest(&ticket, &technicians);

    Ok(ApiResponse::success(TicketSuggestions {
        ticket_id: ticket.id,
        ticket_title: ticket.title,
        suggestions,
    }))
}
