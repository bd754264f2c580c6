use axum::{
    extract::{Path, State},
    Extension,
};
use uuid::Uuid;

use super::load_visible;
use crate::database::models::Ticket;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/tickets/:id
pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Ticket> {
    let ticket = load_visible(&state, &user, id).await?;
    Ok(ApiResponse::success(ticket))
}
