use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{CompanyId, Priority, TicketStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: Priority,
    pub status: TicketStatus,
    pub company_id: CompanyId,
    #[serde(default)]
    pub technician: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sla_due_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub feedback: Option<String>,
}

impl Ticket {
    /// A fresh ticket in `New` status. SLA and timestamps are refined by the hook pipeline.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        priority: Priority,
        company_id: CompanyId,
        created_by: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            category: category.into(),
            priority,
            status: TicketStatus::New,
            company_id,
            technician: None,
            created_by,
            created_at: now,
            updated_at: now,
            resolved_at: None,
            sla_due_at: None,
            rating: None,
            feedback: None,
        }
    }

    pub fn is_unassigned(&self) -> bool {
        self.technician.is_none()
    }

    /// Past its due time without being resolved
    pub fn is_sla_breached(&self, now: DateTime<Utc>) -> bool {
        match self.sla_due_at {
            Some(due) => self.status.is_open() && now > due,
            None => false,
        }
    }
}
