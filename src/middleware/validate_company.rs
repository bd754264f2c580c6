use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::auth::AuthUser;
use crate::database::models::Company;
use crate::error::ApiError;
use crate::state::AppState;

/// The caller's own company, confirmed to exist
#[derive(Clone, Debug)]
pub struct ValidatedCompany(pub Company);

/// Middleware that checks the company from the JWT against the store.
/// Tokens for companies that no longer exist are rejected.
pub async fn validate_company_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Get AuthUser from previous JWT middleware
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("JWT authentication required before company validation"))?;

    let company = state.store.get_company(auth_user.company_id).await?.ok_or_else(|| {
        tracing::warn!("Company validation failed: company {} not found", auth_user.company_id);
        ApiError::forbidden(format!("Company {} does not exist", auth_user.company_id))
    })?;

    tracing::debug!("Company validation successful: {} ({})", company.name, company.id);

    request.extensions_mut().insert(ValidatedCompany(company));

    Ok(next.run(request).await)
}
