use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use crate::relay::events::RelayEvent;
use crate::types::CompanyId;

/// Tenant-scoped fan-out. One broadcast channel per company room, created on
/// first subscription, plus a system-wide channel. Delivery is at-most-once:
/// slow receivers lag and lose events, absent receivers lose everything.
#[derive(Clone)]
pub struct RelayHub {
    inner: Arc<HubInner>,
}

struct HubInner {
    rooms: RwLock<HashMap<CompanyId, broadcast::Sender<RelayEvent>>>,
    global: broadcast::Sender<RelayEvent>,
    capacity: usize,
}

/// Receivers for one joined session
pub struct RoomSubscription {
    pub company_id: CompanyId,
    pub room: broadcast::Receiver<RelayEvent>,
    pub global: broadcast::Receiver<RelayEvent>,
}

impl RelayHub {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (global, _) = broadcast::channel(capacity);
        Self {
            inner: Arc::new(HubInner {
                rooms: RwLock::new(HashMap::new()),
                global,
                capacity,
            }),
        }
    }

    pub async fn subscribe(&self, company_id: CompanyId) -> RoomSubscription {
        let room = {
            let rooms = self.inner.rooms.read().await;
            rooms.get(&company_id).map(|tx| tx.subscribe())
        };

        let room = match room {
            Some(rx) => rx,
            None => {
                let mut rooms = self.inner.rooms.write().await;
                rooms
                    .entry(company_id)
                    .or_insert_with(|| broadcast::channel(self.inner.capacity).0)
                    .subscribe()
            }
        };

        RoomSubscription {
            company_id,
            room,
            global: self.inner.global.subscribe(),
        }
    }

    /// Send to one tenant room. Returns how many sessions received it.
    pub async fn publish(&self, company_id: CompanyId, event: RelayEvent) -> usize {
        let rooms = self.inner.rooms.read().await;
        match rooms.get(&company_id) {
            Some(tx) => match tx.send(event) {
                Ok(receivers) => receivers,
                Err(broadcast::error::SendError(event)) => {
                    debug!("No listeners in room {} for {}", company_id, event.name());
                    0
                }
            },
            None => {
                debug!("No room {} for {}", company_id, event.name());
                0
            }
        }
    }

    /// Send to every joined session regardless of tenant
    pub fn publish_global(&self, event: RelayEvent) -> usize {
        match self.inner.global.send(event) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                debug!("No listeners for global {}", event.name());
                0
            }
        }
    }

    pub async fn subscriber_count(&self, company_id: CompanyId) -> usize {
        self.inner
            .rooms
            .read()
            .await
            .get(&company_id)
            .map_or(0, |tx| tx.receiver_count())
    }

    /// Drop rooms nobody listens to any more
    pub async fn prune(&self) -> usize {
        let mut rooms = self.inner.rooms.write().await;
        let before = rooms.len();
        rooms.retain(|_, tx| tx.receiver_count() > 0);
        before - rooms.len()
    }
}
