use axum::{extract::State, Extension};

use crate::database::models::Company;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, ValidatedCompany};
use crate::state::AppState;

/// GET /api/companies - every company for global roles, otherwise just your own
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Extension(ValidatedCompany(own)): Extension<ValidatedCompany>,
) -> ApiResult<Vec<Company>> {
    if !user.role.is_global() {
        return Ok(ApiResponse::success(vec![own]));
    }

    let companies = state.store.list_companies().await?;
    Ok(ApiResponse::success(companies))
}
