#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use mesob_helpdesk::client::HelpDeskClient;
use mesob_helpdesk::database::models::Ticket;
use mesob_helpdesk::database::seed::{seed_demo, DEMO_PASSWORD};
use mesob_helpdesk::database::MemoryStore;
use mesob_helpdesk::relay::RelayHub;
use mesob_helpdesk::{app, AppState};

pub type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// One in-process server per test over freshly seeded demo data
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub state: AppState,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(MemoryStore::new());
        seed_demo(store.as_ref()).await?;
        let state = AppState::new(store, RelayHub::new(64));

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
        let router = app(state.clone());
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                eprintln!("test server stopped: {}", e);
            }
        });

        Ok(Self { port, base_url, state })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn token(&self, email: &str) -> Result<String> {
        let client = HelpDeskClient::new(&self.base_url)?;
        Ok(client.login(email, DEMO_PASSWORD).await?.token)
    }

    /// Typed API client signed in as a seeded account
    pub async fn client(&self, email: &str) -> Result<HelpDeskClient> {
        let token = self.token(email).await?;
        Ok(HelpDeskClient::new(&self.base_url)?.with_token(token))
    }

    pub async fn technician_id(&self, email: &str) -> Result<uuid::Uuid> {
        self.client(email)
            .await?
            .whoami()
            .await?
            .technician_id
            .context("not a technician")
    }

    pub async fn file_ticket(&self, email: &str, title: &str, category: &str) -> Result<Ticket> {
        let request = mesob_helpdesk::api::CreateTicketRequest {
            title: title.to_string(),
            description: format!("{} needs attention", title),
            category: category.to_string(),
            priority: mesob_helpdesk::types::Priority::Medium,
            created_by: None,
            company_id: None,
        };
        Ok(self.client(email).await?.create_ticket(&request).await?)
    }

    /// Open a relay socket and send the join frame; returns the socket and the first reply
    pub async fn join(&self, email: &str, company_id: i64) -> Result<(Socket, serde_json::Value)> {
        let token = self.token(email).await?;
        let url = format!("ws://127.0.0.1:{}/api/relay?token={}", self.port, token);
        let (mut socket, _) = connect_async(url.as_str()).await?;

        let join = serde_json::json!({"event": "join", "data": {"companyId": company_id}});
        socket.send(Message::Text(join.to_string())).await?;

        let reply = next_frame(&mut socket).await?.context("socket closed before reply")?;
        Ok((socket, reply))
    }
}

/// Next JSON frame, skipping heartbeats. `None` after two quiet seconds or a close.
pub async fn next_frame(socket: &mut Socket) -> Result<Option<serde_json::Value>> {
    loop {
        let frame = match tokio::time::timeout(Duration::from_secs(2), socket.next()).await {
            Ok(Some(frame)) => frame?,
            Ok(None) | Err(_) => return Ok(None),
        };
        match frame {
            Message::Text(text) => {
                let value: serde_json::Value = serde_json::from_str(&text)?;
                if value["event"] != "heartbeat" {
                    return Ok(Some(value));
                }
            }
            Message::Close(_) => return Ok(None),
            _ => {}
        }
    }
}

/// Wait until no frame arrives for a short while
pub async fn expect_silence(socket: &mut Socket) -> Result<()> {
    match tokio::time::timeout(Duration::from_millis(300), socket.next()).await {
        Ok(Some(Ok(Message::Text(text)))) => anyhow::bail!("unexpected frame: {}", text),
        _ => Ok(()),
    }
}
