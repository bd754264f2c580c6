use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use super::load_visible;
use crate::api::RatingRequest;
use crate::database::models::Ticket;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::types::Operation;

/// POST /api/tickets/:id/rating - the requester rates finished work
pub async fn rate(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<RatingRequest>,
) -> ApiResult<Ticket> {
    let before = load_visible(&state, &user, id).await?;
    if before.created_by != user.user_id {
        return Err(ApiError::forbidden("Only the requester can rate a ticket"));
    }

    let mut ticket = before.clone();
    ticket.rating = Some(req.rating);
    ticket.feedback = req.feedback;

    let ticket = state.pipeline.run(Operation::Rate, user.actor(), Some(before), ticket).await?;
    Ok(ApiResponse::success(ticket))
}
