use axum::{extract::State, Extension, Json};

use crate::api::CreateTicketRequest;
use crate::auth::Action;
use crate::database::models::Ticket;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::types::Operation;

/// POST /api/tickets - file a ticket, optionally on behalf of a colleague
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateTicketRequest>,
) -> ApiResult<Ticket> {
    user.require(Action::FileTicket)?;

    let company_id = match req.company_id {
        Some(company_id) if company_id != user.company_id => {
            user.ensure_visible(company_id)?;
            state
                .store
                .get_company(company_id)
                .await?
                .ok_or_else(|| ApiError::invalid_field("companyId", format!("Company {} does not exist", company_id)))?;
            company_id
        }
        _ => user.company_id,
    };

    let created_by = match req.created_by {
        Some(requester) if requester != user.user_id => {
            user.require(Action::FileTicketOnBehalf)?;
            let requester = state
                .store
                .get_user(requester)
                .await?
                .filter(|u| u.company_id == company_id)
                .ok_or_else(|| ApiError::invalid_field("createdBy", "Requester is not a member of this company"))?;
            requester.id
        }
        _ => user.user_id,
    };

    let ticket = Ticket::new(req.title, req.description, req.category, req.priority, company_id, created_by);
    let ticket = state.pipeline.run(Operation::Create, user.actor(), None, ticket).await?;

    tracing::info!("{} filed ticket {} for company {}", user.name, ticket.id, company_id);
    Ok(ApiResponse::created(ticket))
}
