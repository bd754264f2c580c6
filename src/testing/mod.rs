use std::sync::Arc;

use crate::database::models::{Ticket, User};
use crate::database::seed::seed_demo;
use crate::database::{HelpDeskStore, MemoryStore};
use crate::middleware::AuthUser;
use crate::relay::RelayHub;
use crate::state::AppState;
use crate::types::{Operation, Priority};

/// Test utilities: an application state over a seeded in-memory store
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub hub: RelayHub,
    pub state: AppState,
}

impl TestContext {
    pub async fn new() -> anyhow::Result<Self> {
        let store = Arc::new(MemoryStore::new());
        seed_demo(store.as_ref()).await?;

        let hub = RelayHub::new(32);
        let state = AppState::new(store.clone(), hub.clone());
        Ok(Self { store, hub, state })
    }

    /// A seeded demo account
    pub async fn user(&self, email: &str) -> anyhow::Result<User> {
        self.store
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| anyhow::anyhow!("no seeded user {}", email))
    }

    /// What the auth middleware would hand a handler for this account
    pub async fn auth_user(&self, email: &str) -> anyhow::Result<AuthUser> {
        let user = self.user(email).await?;
        Ok(AuthUser {
            user_id: user.id,
            name: user.name,
            role: user.role,
            company_id: user.company_id,
            technician_id: user.technician_id,
        })
    }

    /// File a ticket through the full pipeline as `email`
    pub async fn file_ticket(&self, email: &str, title: &str, category: &str) -> anyhow::Result<Ticket> {
        let user = self.auth_user(email).await?;
        let ticket = Ticket::new(title, "Filed from a test", category, Priority::Medium, user.company_id, user.user_id);
        Ok(self.state.pipeline.run(Operation::Create, user.actor(), None, ticket).await?)
    }
}
