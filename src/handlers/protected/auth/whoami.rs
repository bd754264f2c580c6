use axum::{extract::State, Extension};

use crate::database::models::UserSummary;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/auth/whoami - current user as stored, not as remembered by the token
pub async fn whoami(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<UserSummary> {
    let stored = state
        .store
        .get_user(user.user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User no longer exists"))?;

    Ok(ApiResponse::success(stored.summary()))
}
