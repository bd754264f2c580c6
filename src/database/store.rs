use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Company, Technician, Ticket, User};
use crate::filter::TicketFilter;
use crate::types::CompanyId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Document storage for the help desk. Implementations keep documents as-is;
/// no cross-entity invariants are enforced here.
#[async_trait]
pub trait HelpDeskStore: Send + Sync {
    async fn health_check(&self) -> Result<(), StoreError>;

    /// Newest first
    async fn list_tickets(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, StoreError>;
    async fn get_ticket(&self, id: Uuid) -> Result<Option<Ticket>, StoreError>;
    async fn insert_ticket(&self, ticket: &Ticket) -> Result<(), StoreError>;
    /// Fails with `NotFound` when the ticket does not exist
    async fn update_ticket(&self, ticket: &Ticket) -> Result<(), StoreError>;

    async fn list_technicians(&self, company_id: Option<CompanyId>) -> Result<Vec<Technician>, StoreError>;
    async fn get_technician(&self, id: Uuid) -> Result<Option<Technician>, StoreError>;
    async fn save_technician(&self, technician: &Technician) -> Result<(), StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    /// Fails with `Conflict` when the email is taken
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    async fn list_companies(&self) -> Result<Vec<Company>, StoreError>;
    async fn get_company(&self, id: CompanyId) -> Result<Option<Company>, StoreError>;
    /// Fails with `Conflict` when the id is taken
    async fn insert_company(&self, company: &Company) -> Result<(), StoreError>;
}
