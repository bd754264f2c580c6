use axum::{extract::State, Extension, Json};

use crate::api::CreateCompanyRequest;
use crate::auth::Action;
use crate::database::models::Company;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// POST /api/root/companies - register a tenant
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateCompanyRequest>,
) -> ApiResult<Company> {
    user.require(Action::ManageCompanies)?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::invalid_field("name", "Company name is required"));
    }

    let id = match req.id {
        Some(id) if id <= 0 => return Err(ApiError::invalid_field("id", "Company id must be positive")),
        Some(id) => id,
        None => {
            let companies = state.store.list_companies().await?;
            companies.iter().map(|c| c.id).max().unwrap_or(0) + 1
        }
    };

    let company = Company::new(id, name);
    state.store.insert_company(&company).await?;

    tracing::info!("{} registered company {} ({})", user.name, company.name, company.id);
    Ok(ApiResponse::created(company))
}
