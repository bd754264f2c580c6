use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::database::models::{Technician, Ticket};
use crate::types::{Priority, TicketStatus};

/// Aggregates shown on the admin dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_tickets: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_priority: BTreeMap<String, usize>,
    pub open_tickets: usize,
    pub unassigned_tickets: usize,
    pub sla_breaches: usize,
    /// `None` until a ticket has been rated
    pub average_rating: Option<f64>,
    pub technicians_on_duty: usize,
    pub technicians_total: usize,
}

impl DashboardStats {
    pub fn compute(tickets: &[Ticket], technicians: &[Technician], now: DateTime<Utc>) -> Self {
        let mut by_status: BTreeMap<String, usize> =
            TicketStatus::ALL.iter().map(|s| (s.as_str().to_string(), 0)).collect();
        let mut by_priority: BTreeMap<String, usize> =
            Priority::ALL.iter().map(|p| (p.as_str().to_string(), 0)).collect();

        let mut open_tickets = 0;
        let mut unassigned_tickets = 0;
        let mut sla_breaches = 0;
        let mut rating_sum = 0u32;
        let mut rated = 0u32;

        for ticket in tickets {
            *by_status.entry(ticket.status.as_str().to_string()).or_default() += 1;
            *by_priority.entry(ticket.priority.as_str().to_string()).or_default() += 1;

            if ticket.status.is_open() {
                open_tickets += 1;
                if ticket.is_unassigned() {
                    unassigned_tickets += 1;
                }
            }
            if ticket.is_sla_breached(now) {
                sla_breaches += 1;
            }
            if let Some(rating) = ticket.rating {
                rating_sum += u32::from(rating);
                rated += 1;
            }
        }

        Self {
            total_tickets: tickets.len(),
            by_status,
            by_priority,
            open_tickets,
            unassigned_tickets,
            sla_breaches,
            average_rating: (rated > 0).then(|| f64::from(rating_sum) / f64::from(rated)),
            technicians_on_duty: technicians.iter().filter(|t| t.is_available).count(),
            technicians_total: technicians.len(),
        }
    }
}
