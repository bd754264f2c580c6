use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use sqlx::{PgPool, Row};
use tracing::debug;
use uuid::Uuid;

use crate::database::models::{Company, Technician, Ticket, User};
use crate::database::store::{HelpDeskStore, StoreError};
use crate::filter::TicketFilter;
use crate::types::CompanyId;

const TICKETS: &str = "tickets";
const TECHNICIANS: &str = "technicians";
const USERS: &str = "users";
const COMPANIES: &str = "companies";

/// Postgres-backed store. Every entity lives in one generic `documents` table
/// as a JSONB body keyed by (collection, id).
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection  TEXT        NOT NULL,
                id          TEXT        NOT NULL,
                company_id  BIGINT,
                body        JSONB       NOT NULL,
                created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS documents_company_idx ON documents (collection, company_id)")
            .execute(&self.pool)
            .await?;

        debug!("documents schema ready");
        Ok(())
    }

    async fn put<T: Serialize + Sync>(
        &self,
        collection: &str,
        id: &str,
        company_id: Option<CompanyId>,
        doc: &T,
    ) -> Result<(), StoreError> {
        let body = serde_json::to_value(doc)?;
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, company_id, body)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (collection, id)
            DO UPDATE SET company_id = EXCLUDED.company_id, body = EXCLUDED.body, updated_at = now()
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(company_id)
        .bind(body)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert only; returns false when the key already exists
    async fn create<T: Serialize + Sync>(
        &self,
        collection: &str,
        id: &str,
        company_id: Option<CompanyId>,
        doc: &T,
    ) -> Result<bool, StoreError> {
        let body = serde_json::to_value(doc)?;
        let result = sqlx::query(
            r#"
            INSERT INTO documents (collection, id, company_id, body)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (collection, id) DO NOTHING
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(company_id)
        .bind(body)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn get<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<Option<T>, StoreError> {
        let row = sqlx::query("SELECT body FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let body: Value = row.try_get("body")?;
                Ok(Some(serde_json::from_value(body)?))
            }
            None => Ok(None),
        }
    }

    async fn list<T: DeserializeOwned>(
        &self,
        collection: &str,
        company_id: Option<CompanyId>,
    ) -> Result<Vec<T>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT body FROM documents
            WHERE collection = $1 AND ($2::BIGINT IS NULL OR company_id = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(collection)
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| -> Result<T, StoreError> {
                let body: Value = row.try_get("body")?;
                Ok(serde_json::from_value(body)?)
            })
            .collect()
    }
}

#[async_trait]
impl HelpDeskStore for PgStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_tickets(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, StoreError> {
        // Company is the only indexed predicate; the rest is matched on the documents
        let tickets: Vec<Ticket> = self.list(TICKETS, filter.company_id).await?;
        let mut found: Vec<Ticket> = tickets.into_iter().filter(|t| filter.matches(t)).collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn get_ticket(&self, id: Uuid) -> Result<Option<Ticket>, StoreError> {
        self.get(TICKETS, &id.to_string()).await
    }

    async fn insert_ticket(&self, ticket: &Ticket) -> Result<(), StoreError> {
        if !self.create(TICKETS, &ticket.id.to_string(), Some(ticket.company_id), ticket).await? {
            return Err(StoreError::Conflict(format!("ticket {} already exists", ticket.id)));
        }
        Ok(())
    }

    async fn update_ticket(&self, ticket: &Ticket) -> Result<(), StoreError> {
        let body = serde_json::to_value(ticket)?;
        let result = sqlx::query(
            r#"
            UPDATE documents SET body = $3, company_id = $4, updated_at = now()
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(TICKETS)
        .bind(ticket.id.to_string())
        .bind(body)
        .bind(ticket.company_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("ticket {}", ticket.id)));
        }
        Ok(())
    }

    async fn list_technicians(&self, company_id: Option<CompanyId>) -> Result<Vec<Technician>, StoreError> {
        let mut technicians: Vec<Technician> = self.list(TECHNICIANS, company_id).await?;
        technicians.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(technicians)
    }

    async fn get_technician(&self, id: Uuid) -> Result<Option<Technician>, StoreError> {
        self.get(TECHNICIANS, &id.to_string()).await
    }

    async fn save_technician(&self, technician: &Technician) -> Result<(), StoreError> {
        let mut stored = technician.clone();
        stored.current_tickets = None;
        self.put(TECHNICIANS, &stored.id.to_string(), Some(stored.company_id), &stored).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT body FROM documents WHERE collection = $1 AND body->>'email' = $2")
            .bind(USERS)
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let body: Value = row.try_get("body")?;
                Ok(Some(serde_json::from_value(body)?))
            }
            None => Ok(None),
        }
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.get(USERS, &id.to_string()).await
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        if self.find_user_by_email(&user.email).await?.is_some() {
            return Err(StoreError::Conflict(format!("email {} already registered", user.email)));
        }
        if !self.create(USERS, &user.id.to_string(), Some(user.company_id), user).await? {
            return Err(StoreError::Conflict(format!("user {} already exists", user.id)));
        }
        Ok(())
    }

    async fn list_companies(&self) -> Result<Vec<Company>, StoreError> {
        let mut companies: Vec<Company> = self.list(COMPANIES, None).await?;
        companies.sort_by_key(|c| c.id);
        Ok(companies)
    }

    async fn get_company(&self, id: CompanyId) -> Result<Option<Company>, StoreError> {
        self.get(COMPANIES, &id.to_string()).await
    }

    async fn insert_company(&self, company: &Company) -> Result<(), StoreError> {
        if !self.create(COMPANIES, &company.id.to_string(), Some(company.id), company).await? {
            return Err(StoreError::Conflict(format!("company {} already exists", company.id)));
        }
        Ok(())
    }
}
