use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Role;
use crate::database::models::Ticket;
use crate::types::CompanyId;

/// Audience of a broadcast announcement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum BroadcastTarget {
    All,
    Company(CompanyId),
    Role(Role),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastMessage {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub message: String,
    pub target: BroadcastTarget,
    pub sender: String,
    pub created_at: DateTime<Utc>,
}

/// Who is looking. Used to decide whether an event is meant for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: Uuid,
    pub company_id: CompanyId,
    pub role: Role,
}

impl Viewer {
    /// Employees only ever see tickets they filed
    pub fn sees(&self, ticket: &Ticket) -> bool {
        self.role != Role::Employee || ticket.created_by == self.user_id
    }
}

impl BroadcastMessage {
    pub fn new(message: impl Into<String>, target: BroadcastTarget, sender: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            target,
            sender: sender.into(),
            created_at: Utc::now(),
        }
    }

    pub fn reaches(&self, viewer: &Viewer) -> bool {
        match self.target {
            BroadcastTarget::All => true,
            BroadcastTarget::Company(company_id) => company_id == viewer.company_id,
            BroadcastTarget::Role(role) => role == viewer.role,
        }
    }
}

/// Events pushed to joined sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum RelayEvent {
    TicketCreated(Ticket),
    TicketUpdated(Ticket),
    BroadcastMessage(BroadcastMessage),
}

impl RelayEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RelayEvent::TicketCreated(_) => "ticket_created",
            RelayEvent::TicketUpdated(_) => "ticket_updated",
            RelayEvent::BroadcastMessage(_) => "broadcast_message",
        }
    }

    /// Ticket events are already room-scoped but still pass the viewer's
    /// visibility; broadcasts are checked against the audience
    pub fn is_for(&self, viewer: &Viewer) -> bool {
        match self {
            RelayEvent::TicketCreated(ticket) | RelayEvent::TicketUpdated(ticket) => viewer.sees(ticket),
            RelayEvent::BroadcastMessage(message) => message.reaches(viewer),
        }
    }
}

/// Frames a client sends to the relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientFrame {
    Join {
        #[serde(rename = "companyId")]
        company_id: CompanyId,
    },
}

/// Control frames the relay sends besides events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ControlFrame {
    Joined {
        #[serde(rename = "companyId")]
        company_id: CompanyId,
    },
    Error {
        message: String,
    },
    Heartbeat,
}

/// Anything a client may receive
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Inbound {
    Event(RelayEvent),
    Control(ControlFrame),
}
