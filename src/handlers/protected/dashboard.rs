use axum::{
    extract::{Query, State},
    Extension,
};
use chrono::Utc;

use super::technicians::list::scope;
use crate::api::CompanyQuery;
use crate::auth::Action;
use crate::filter::TicketFilter;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::DashboardStats;
use crate::state::AppState;

/// GET /api/dashboard/stats?companyId=
pub async fn stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<CompanyQuery>,
) -> ApiResult<DashboardStats> {
    user.require(Action::ViewDashboard)?;
    let company_id = scope(&user, query.company_id)?;

    let filter = TicketFilter {
        company_id,
        ..Default::default()
    };
    let tickets = state.store.list_tickets(&filter).await?;
    let technicians = state.store.list_technicians(company_id).await?;

    Ok(ApiResponse::success(DashboardStats::compute(&tickets, &technicians, Utc::now())))
}
