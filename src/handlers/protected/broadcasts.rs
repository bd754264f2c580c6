use axum::{extract::State, Extension, Json};

use crate::api::{BroadcastReceipt, BroadcastRequest};
use crate::auth::Action;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::relay::{BroadcastMessage, BroadcastTarget, RelayEvent};
use crate::state::AppState;

/// POST /api/broadcasts - announce to everyone, a company, or a role.
///
/// Routing: `all` and (for global admins) role targets use the system-wide
/// channel; company targets and a company admin's role targets go to one room.
pub async fn send(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<BroadcastRequest>,
) -> ApiResult<BroadcastReceipt> {
    user.require(Action::SendBroadcast)?;

    let text = req.message.trim();
    if text.is_empty() {
        return Err(ApiError::invalid_field("message", "Message is required"));
    }

    let message = BroadcastMessage::new(text, req.target, user.name.clone());
    let event = RelayEvent::BroadcastMessage(message.clone());

    let delivered = match req.target {
        BroadcastTarget::All => {
            user.require(Action::SendGlobalBroadcast)?;
            state.relay.publish_global(event)
        }
        BroadcastTarget::Company(company_id) => {
            user.ensure_visible(company_id)?;
            state.relay.publish(company_id, event).await
        }
        BroadcastTarget::Role(_) if user.role.is_global() => state.relay.publish_global(event),
        BroadcastTarget::Role(_) => state.relay.publish(user.company_id, event).await,
    };

    tracing::info!("{} broadcast to {:?}, {} sessions reached", user.name, req.target, delivered);
    Ok(ApiResponse::created(BroadcastReceipt { message, delivered }))
}
