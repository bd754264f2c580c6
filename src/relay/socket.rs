use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::auth::{self, Claims};
use crate::config;
use crate::error::ApiError;
use crate::relay::events::{ClientFrame, ControlFrame, Viewer};
use crate::relay::hub::RelayHub;
use crate::state::AppState;
use crate::types::CompanyId;

#[derive(Debug, Deserialize)]
pub struct RelayQuery {
    /// Browsers cannot set headers on a socket upgrade, so the JWT rides in the query
    pub token: String,
}

/// GET /api/relay?token=... - upgrade to the realtime relay
pub async fn relay_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<RelayQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let claims = auth::validate_jwt(&query.token).map_err(|e| {
        warn!("Relay connection rejected: {}", e);
        ApiError::unauthorized("Invalid relay token")
    })?;

    info!("Relay connection request from {} ({})", claims.name, claims.role);
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state.relay, claims)))
}

type Sink = SplitSink<WebSocket, Message>;

async fn send_json<T: Serialize>(sender: &mut Sink, frame: &T) -> bool {
    match serde_json::to_string(frame) {
        Ok(text) => sender.send(Message::Text(text)).await.is_ok(),
        Err(e) => {
            warn!("Failed to encode relay frame: {}", e);
            true
        }
    }
}

/// Which room a session may join
fn authorize_join(claims: &Claims, requested: CompanyId) -> Result<CompanyId, String> {
    if claims.role.is_global() || requested == claims.company_id {
        Ok(requested)
    } else {
        Err(format!("not allowed to join company {}", requested))
    }
}

async fn await_join(receiver: &mut futures::stream::SplitStream<WebSocket>, claims: &Claims) -> Result<CompanyId, String> {
    let timeout = Duration::from_secs(config::config().relay.join_timeout_secs);

    let wait = async {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    return match serde_json::from_str::<ClientFrame>(&text) {
                        Ok(ClientFrame::Join { company_id }) => authorize_join(claims, company_id),
                        Err(_) => Err("expected a join frame".to_string()),
                    };
                }
                Ok(Message::Close(_)) | Err(_) => return Err("closed before join".to_string()),
                _ => {}
            }
        }
        Err("closed before join".to_string())
    };

    match tokio::time::timeout(timeout, wait).await {
        Ok(result) => result,
        Err(_) => Err("join timed out".to_string()),
    }
}

async fn handle_socket(socket: WebSocket, hub: RelayHub, claims: Claims) {
    let (mut sender, mut receiver) = socket.split();

    let company_id = match await_join(&mut receiver, &claims).await {
        Ok(company_id) => company_id,
        Err(message) => {
            warn!("Relay join failed for {}: {}", claims.name, message);
            let _ = send_json(&mut sender, &ControlFrame::Error { message }).await;
            let _ = sender.close().await;
            return;
        }
    };

    // Global admins watching another tenant see that tenant's company broadcasts
    let viewer = Viewer {
        user_id: claims.sub,
        company_id,
        role: claims.role,
    };
    let mut subscription = hub.subscribe(company_id).await;

    if !send_json(&mut sender, &ControlFrame::Joined { company_id }).await {
        return;
    }
    info!("{} joined relay room {}", claims.name, company_id);

    let heartbeat_secs = config::config().relay.heartbeat_secs.max(1);
    let mut heartbeat = tokio::time::interval(Duration::from_secs(heartbeat_secs));
    heartbeat.tick().await;

    loop {
        let event = tokio::select! {
            result = subscription.room.recv() => result,
            result = subscription.global.recv() => result,
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        debug!("Relay receive error for {}: {}", claims.name, e);
                        break;
                    }
                    // Sessions only talk once; later frames are ignored
                    Some(Ok(_)) => continue,
                }
            }
            _ = heartbeat.tick() => {
                if !send_json(&mut sender, &ControlFrame::Heartbeat).await {
                    break;
                }
                continue;
            }
        };

        match event {
            Ok(event) => {
                if !event.is_for(&viewer) {
                    continue;
                }
                if !send_json(&mut sender, &event).await {
                    break;
                }
            }
            Err(RecvError::Lagged(n)) => {
                warn!("Relay session {} lagged behind by {} events", claims.name, n);
            }
            Err(RecvError::Closed) => break,
        }
    }

    drop(subscription);
    hub.prune().await;
    info!("{} left relay room {}", claims.name, company_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use uuid::Uuid;

    fn claims(role: Role, company_id: CompanyId) -> Claims {
        Claims::new(Uuid::new_v4(), "tester".into(), role, company_id, None)
    }

    #[test]
    fn tenant_roles_join_only_their_company() {
        assert_eq!(authorize_join(&claims(Role::Employee, 1), 1), Ok(1));
        assert!(authorize_join(&claims(Role::Employee, 1), 2).is_err());
        assert!(authorize_join(&claims(Role::CompanyAdmin, 1), 2).is_err());
    }

    #[test]
    fn global_roles_join_any_company() {
        assert_eq!(authorize_join(&claims(Role::SuperAdmin, 1), 2), Ok(2));
        assert_eq!(authorize_join(&claims(Role::SystemAdmin, 1), 7), Ok(7));
    }
}
