use futures::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use url::Url;

use crate::config;
use crate::relay::events::{ClientFrame, ControlFrame, Inbound, RelayEvent};
use crate::types::CompanyId;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Relay connection failed: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Relay refused to join: {0}")]
    Rejected(String),

    #[error("Relay closed before confirming the join")]
    Closed,

    #[error("Relay did not confirm the join in time")]
    Timeout,

    #[error("Invalid relay frame: {0}")]
    Frame(#[from] serde_json::Error),
}

/// One joined relay connection. A reader task decodes frames into a bounded
/// mailbox; the owner drains it on its own schedule. Dropping the client
/// stops the reader.
pub struct RelayClient {
    company_id: CompanyId,
    mailbox: mpsc::Receiver<RelayEvent>,
    connected: Arc<AtomicBool>,
    reader: JoinHandle<()>,
}

impl RelayClient {
    pub async fn connect(url: &Url, company_id: CompanyId) -> Result<Self, RelayError> {
        let relay = &config::config().relay;
        let (socket, _) = connect_async(url.as_str()).await?;
        let (mut sink, mut stream) = socket.split();

        let join = serde_json::to_string(&ClientFrame::Join { company_id })?;
        sink.send(Message::Text(join)).await?;

        let confirm = async {
            while let Some(frame) = stream.next().await {
                match frame? {
                    Message::Text(text) => match serde_json::from_str::<Inbound>(&text)? {
                        Inbound::Control(ControlFrame::Joined { .. }) => return Ok(()),
                        Inbound::Control(ControlFrame::Error { message }) => return Err(RelayError::Rejected(message)),
                        _ => {}
                    },
                    Message::Close(_) => return Err(RelayError::Closed),
                    _ => {}
                }
            }
            Err(RelayError::Closed)
        };
        tokio::time::timeout(Duration::from_secs(relay.join_timeout_secs), confirm)
            .await
            .map_err(|_| RelayError::Timeout)??;

        tracing::info!("Joined relay room {}", company_id);

        let (tx, mailbox) = mpsc::channel(relay.client_mailbox.max(1));
        let connected = Arc::new(AtomicBool::new(true));
        let flag = connected.clone();

        let reader = tokio::spawn(async move {
            // Holding the sink keeps the write half open for the life of the reader
            let _sink = sink;
            while let Some(frame) = stream.next().await {
                let text = match frame {
                    Ok(Message::Text(text)) => text,
                    Ok(Message::Close(_)) => break,
                    Ok(_) => continue,
                    Err(e) => {
                        tracing::warn!("Relay read error: {}", e);
                        break;
                    }
                };

                match serde_json::from_str::<Inbound>(&text) {
                    Ok(Inbound::Event(event)) => {
                        // Waits when the mailbox is full; the owner is the only consumer
                        if tx.send(event).await.is_err() {
                            break;
                        }
                    }
                    Ok(Inbound::Control(ControlFrame::Heartbeat)) => tracing::trace!("Relay heartbeat"),
                    Ok(Inbound::Control(ControlFrame::Error { message })) => {
                        tracing::warn!("Relay error: {}", message)
                    }
                    Ok(Inbound::Control(ControlFrame::Joined { .. })) => {}
                    Err(e) => tracing::warn!("Ignoring undecodable relay frame: {}", e),
                }
            }
            flag.store(false, Ordering::SeqCst);
            tracing::info!("Relay connection closed");
        });

        Ok(Self {
            company_id,
            mailbox,
            connected,
            reader,
        })
    }

    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Everything queued so far, without waiting
    pub fn drain(&mut self) -> Vec<RelayEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.mailbox.try_recv() {
            events.push(event);
        }
        events
    }

    /// Wait for the next event; `None` once the connection is gone and the mailbox is empty
    pub async fn next(&mut self) -> Option<RelayEvent> {
        self.mailbox.recv().await
    }
}

impl Drop for RelayClient {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

/// Who the relay connection belongs to. A different identity means a new connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayIdentity {
    /// Carries the session token
    pub url: Url,
    pub company_id: CompanyId,
}

/// Owns at most one relay connection for the current identity
#[derive(Default)]
pub struct RelaySession {
    identity: Option<RelayIdentity>,
    client: Option<RelayClient>,
}

impl RelaySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure a live connection exists for `identity`, replacing one that
    /// belongs to someone else or has dropped. Failures are logged and leave
    /// the session disconnected.
    pub async fn ensure(&mut self, identity: &RelayIdentity) -> bool {
        if self.identity.as_ref() != Some(identity) {
            self.disconnect();
        }
        if self.is_connected() {
            return true;
        }

        self.client = None;
        match RelayClient::connect(&identity.url, identity.company_id).await {
            Ok(client) => {
                self.client = Some(client);
                self.identity = Some(identity.clone());
                true
            }
            Err(e) => {
                tracing::warn!("Relay unavailable, continuing without live updates: {}", e);
                false
            }
        }
    }

    pub fn disconnect(&mut self) {
        if self.client.take().is_some() {
            tracing::debug!("Relay session dropped");
        }
        self.identity = None;
    }

    pub fn is_connected(&self) -> bool {
        self.client.as_ref().is_some_and(RelayClient::is_connected)
    }

    pub fn drain(&mut self) -> Vec<RelayEvent> {
        self.client.as_mut().map(RelayClient::drain).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_relays_leave_the_session_disconnected() {
        let port = portpicker::pick_unused_port().expect("free port");
        let identity = RelayIdentity {
            url: Url::parse(&format!("ws://127.0.0.1:{}/api/relay?token=x", port)).unwrap(),
            company_id: 1,
        };

        let mut session = RelaySession::new();
        assert!(!session.ensure(&identity).await);
        assert!(!session.is_connected());
        assert!(session.drain().is_empty());
    }
}
