use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::{Technician, Ticket};
use crate::database::{HelpDeskStore, StoreError};
use crate::filter::TicketFilter;
use crate::types::CompanyId;

/// Fill `current_tickets` with each technician's open ticket count
pub fn attach_workload(technicians: &mut [Technician], tickets: &[Ticket]) {
    let mut open: HashMap<Uuid, u32> = HashMap::new();
    for ticket in tickets.iter().filter(|t| t.status.is_open()) {
        if let Some(technician) = ticket.technician {
            *open.entry(technician).or_default() += 1;
        }
    }

    for technician in technicians.iter_mut() {
        technician.current_tickets = Some(open.get(&technician.id).copied().unwrap_or(0));
    }
}

/// Technicians of one company (or all) with workload derived from stored tickets
pub async fn technicians_with_workload(
    store: &dyn HelpDeskStore,
    company_id: Option<CompanyId>,
) -> Result<Vec<Technician>, StoreError> {
    let mut technicians = store.list_technicians(company_id).await?;
    let filter = TicketFilter {
        company_id,
        ..Default::default()
    };
    let tickets = store.list_tickets(&filter).await?;
    attach_workload(&mut technicians, &tickets);
    Ok(technicians)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DutyStatus, Priority, TicketStatus};

    #[test]
    fn counts_only_open_tickets() {
        let mut techs = vec![
            Technician::new("a", "a@x.et", "Network", 1, DutyStatus::Online),
            Technician::new("b", "b@x.et", "Network", 1, DutyStatus::Online),
        ];
        let assigned = |status| {
            let mut t = Ticket::new("t", "d", "Network", Priority::Low, 1, Uuid::new_v4());
            t.technician = Some(techs[0].id);
            t.status = status;
            t
        };
        let tickets = vec![
            assigned(TicketStatus::Assigned),
            assigned(TicketStatus::InProgress),
            assigned(TicketStatus::Closed),
        ];

        attach_workload(&mut techs, &tickets);
        assert_eq!(techs[0].current_tickets, Some(2));
        assert_eq!(techs[1].current_tickets, Some(0));
    }
}
