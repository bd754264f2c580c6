use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::Role;
use crate::database::models::Ticket;
use crate::observer::error::HookError;
use crate::types::{CompanyId, Operation};

/// Who triggered the write
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: Uuid,
    pub name: String,
    pub role: Role,
    pub company_id: CompanyId,
}

/// State flowing through the hook pipeline for a single ticket write.
/// `ticket` is the proposed new state; hooks may rewrite it before persistence.
#[derive(Debug)]
pub struct HookContext {
    pub operation: Operation,
    pub actor: Actor,
    /// Stored state before this write, `None` on create
    pub before: Option<Ticket>,
    pub ticket: Ticket,
    pub now: DateTime<Utc>,
    pub errors: Vec<HookError>,
}

impl HookContext {
    pub fn new(operation: Operation, actor: Actor, before: Option<Ticket>, ticket: Ticket) -> Self {
        Self {
            operation,
            actor,
            before,
            ticket,
            now: Utc::now(),
            errors: Vec::new(),
        }
    }

    /// Whether a field changed relative to the stored state
    pub fn changed<T: PartialEq>(&self, field: impl Fn(&Ticket) -> T) -> bool {
        match &self.before {
            Some(before) => field(before) != field(&self.ticket),
            None => true,
        }
    }
}
