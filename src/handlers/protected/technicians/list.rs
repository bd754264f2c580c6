use axum::{
    extract::{Query, State},
    Extension,
};

use crate::api::TechnicianQuery;
use crate::database::models::Technician;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::technicians_with_workload;
use crate::state::AppState;
use crate::types::CompanyId;

/// GET /api/technicians?includeWorkload=&companyId=
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<TechnicianQuery>,
) -> ApiResult<Vec<Technician>> {
    let company_id = scope(&user, query.company_id)?;

    let technicians = if query.include_workload.unwrap_or(false) {
        technicians_with_workload(state.store.as_ref(), company_id).await?
    } else {
        state.store.list_technicians(company_id).await?
    };
    Ok(ApiResponse::success(technicians))
}

/// Company to read: global roles choose (or see all), everyone else gets their own
pub(crate) fn scope(user: &AuthUser, requested: Option<CompanyId>) -> Result<Option<CompanyId>, ApiError> {
    match requested {
        Some(company_id) => {
            user.ensure_visible(company_id)?;
            Ok(Some(company_id))
        }
        None if user.role.is_global() => Ok(None),
        None => Ok(Some(user.company_id)),
    }
}
