//! Technician assignment recommender.
//!
//! Ranks technicians for a ticket with a fixed weighted sum:
//!
//! | signal              | points                          |
//! |---------------------|---------------------------------|
//! | available           | 40                              |
//! | workload            | `max(0, 30 - current_tickets*5)`|
//! | department match    | 20 (category or "IT Operations")|
//! | same company        | 10                              |
//!
//! Totals are clamped to 100. Ranking is a stable sort, so technicians with
//! equal scores keep the order they were given in.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{Technician, Ticket};

pub const MAX_SUGGESTIONS: usize = 3;
pub const MAX_SCORE: u32 = 100;

/// Department that handles every category
pub const CATCH_ALL_DEPARTMENT: &str = "IT Operations";

const AVAILABILITY_POINTS: u32 = 40;
const WORKLOAD_CEILING: u32 = 30;
const POINTS_PER_OPEN_TICKET: u32 = 5;
const DEPARTMENT_POINTS: u32 = 20;
const TENANT_POINTS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reason {
    #[serde(rename = "Current Availability")]
    CurrentAvailability,
    #[serde(rename = "Low Workload")]
    LowWorkload,
    #[serde(rename = "Manageable Workload")]
    ManageableWorkload,
    #[serde(rename = "Department Match")]
    DepartmentMatch,
    #[serde(rename = "On-site Personnel")]
    OnSitePersonnel,
}

impl Reason {
    pub fn label(&self) -> &'static str {
        match self {
            Reason::CurrentAvailability => "Current Availability",
            Reason::LowWorkload => "Low Workload",
            Reason::ManageableWorkload => "Manageable Workload",
            Reason::DepartmentMatch => "Department Match",
            Reason::OnSitePersonnel => "On-site Personnel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    pub points: u32,
    pub reasons: Vec<Reason>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub technician_id: Uuid,
    pub technician_name: String,
    pub score: u32,
    pub reasons: Vec<Reason>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketSuggestions {
    pub ticket_id: Uuid,
    pub ticket_title: String,
    pub suggestions: Vec<Suggestion>,
}

pub fn score(ticket: &Ticket, technician: &Technician) -> Score {
    let mut points = 0;
    let mut reasons = Vec::new();

    if technician.is_available {
        points += AVAILABILITY_POINTS;
        reasons.push(Reason::CurrentAvailability);
    }

    let open = technician.current_tickets.unwrap_or(0);
    let workload = WORKLOAD_CEILING.saturating_sub(open.saturating_mul(POINTS_PER_OPEN_TICKET));
    points += workload;
    if workload >= 20 {
        reasons.push(Reason::LowWorkload);
    } else if workload > 0 {
        reasons.push(Reason::ManageableWorkload);
    }

    if technician.department == ticket.category || technician.department == CATCH_ALL_DEPARTMENT {
        points += DEPARTMENT_POINTS;
        reasons.push(Reason::DepartmentMatch);
    }

    if technician.company_id == ticket.company_id {
        points += TENANT_POINTS;
        reasons.push(Reason::OnSitePersonnel);
    }

    Score {
        points: points.min(MAX_SCORE),
        reasons,
    }
}

/// Top suggestions for one ticket, best first
pub fn suggest(ticket: &Ticket, technicians: &[Technician]) -> Vec<Suggestion> {
    let mut ranked: Vec<Suggestion> = technicians
        .iter()
        .map(|technician| {
            let Score { points, reasons } = score(ticket, technician);
            Suggestion {
                technician_id: technician.id,
                technician_name: technician.name.clone(),
                score: points,
                reasons,
            }
        })
        .collect();

    // sort_by is stable: ties keep input order
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(MAX_SUGGESTIONS);
    ranked
}

/// Suggestions for every open ticket without a technician
pub fn suggest_unassigned(tickets: &[Ticket], technicians: &[Technician]) -> Vec<TicketSuggestions> {
    tickets
        .iter()
        .filter(|t| t.is_unassigned() && t.status.is_open())
        .map(|ticket| TicketSuggestions {
            ticket_id: ticket.id,
            ticket_title: ticket.title.clone(),
            suggestions: suggest(ticket, technicians),
        })
        .collect()
}
