use axum::{
    extract::{Query, State},
    Extension,
};

use crate::database::models::Ticket;
use crate::filter::TicketFilter;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/tickets - newest first, narrowed to what the caller may see
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(filter): Query<TicketFilter>,
) -> ApiResult<Vec<Ticket>> {
    filter.validate()?;
    let filter = filter.scoped(user.role, user.company_id, user.user_id)?;

    let tickets = state.store.list_tickets(&filter).await?;
    tracing::debug!("{} listed {} tickets", user.name, tickets.len());
    Ok(ApiResponse::success(tickets))
}
