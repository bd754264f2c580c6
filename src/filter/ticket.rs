use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Role;
use crate::database::models::Ticket;
use crate::filter::FilterError;
use crate::types::{CompanyId, TicketStatus};

/// Ticket list query. Doubles as the client cache key, so it must stay hashable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unassigned: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<CompanyId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technician: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
}

impl TicketFilter {
    pub fn unassigned() -> Self {
        Self {
            unassigned: Some(true),
            ..Default::default()
        }
    }

    pub fn for_company(company_id: CompanyId) -> Self {
        Self {
            company_id: Some(company_id),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => Err(FilterError::InvalidRange),
            _ => Ok(()),
        }
    }

    /// Narrow the filter to what a caller may see. Non-global roles are pinned to
    /// their company and employees only ever see tickets they filed.
    pub fn scoped(mut self, role: Role, company_id: CompanyId, user_id: Uuid) -> Result<Self, FilterError> {
        if !role.is_global() {
            match self.company_id {
                Some(requested) if requested != company_id => {
                    return Err(FilterError::ForeignCompany(requested));
                }
                _ => self.company_id = Some(company_id),
            }
        }
        if role == Role::Employee {
            self.created_by = Some(user_id);
        }
        Ok(self)
    }

    pub fn matches(&self, ticket: &Ticket) -> bool {
        if let Some(unassigned) = self.unassigned {
            if ticket.is_unassigned() != unassigned {
                return false;
            }
        }
        if let Some(company_id) = self.company_id {
            if ticket.company_id != company_id {
                return false;
            }
        }
        if let Some(technician) = self.technician {
            if ticket.technician != Some(technician) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if ticket.status != status {
                return false;
            }
        }
        if let Some(created_by) = self.created_by {
            if ticket.created_by != created_by {
                return false;
            }
        }
        if let Some(from) = self.from {
            if ticket.created_at < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if ticket.created_at > to {
                return false;
            }
        }
        true
    }

    /// Query-string pairs for the HTTP client
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(v) = self.unassigned {
            pairs.push(("unassigned", v.to_string()));
        }
        if let Some(v) = self.company_id {
            pairs.push(("companyId", v.to_string()));
        }
        if let Some(v) = self.technician {
            pairs.push(("technician", v.to_string()));
        }
        if let Some(v) = self.status {
            pairs.push(("status", v.as_str().to_string()));
        }
        if let Some(v) = self.created_by {
            pairs.push(("createdBy", v.to_string()));
        }
        if let Some(v) = self.from {
            pairs.push(("from", v.to_rfc3339()));
        }
        if let Some(v) = self.to {
            pairs.push(("to", v.to_rfc3339()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Priority;
    use chrono::Duration;

    fn ticket(company_id: CompanyId) -> Ticket {
        Ticket::new("Printer jam", "Tray 2", "Hardware", Priority::Low, company_id, Uuid::new_v4())
    }

    #[test]
    fn unassigned_filter_tracks_technician_field() {
        let mut t = ticket(1);
        assert!(TicketFilter::unassigned().matches(&t));
        t.technician = Some(Uuid::new_v4());
        assert!(!TicketFilter::unassigned().matches(&t));
    }

    #[test]
    fn date_range_is_inclusive() {
        let t = ticket(1);
        let filter = TicketFilter {
            from: Some(t.created_at),
            to: Some(t.created_at),
            ..Default::default()
        };
        assert!(filter.matches(&t));

        let later = TicketFilter {
            from: Some(t.created_at + Duration::seconds(1)),
            ..Default::default()
        };
        assert!(!later.matches(&t));
    }

    #[test]
    fn rejects_inverted_range() {
        let now = Utc::now();
        let filter = TicketFilter {
            from: Some(now),
            to: Some(now - Duration::days(1)),
            ..Default::default()
        };
        assert_eq!(filter.validate(), Err(FilterError::InvalidRange));
    }

    #[test]
    fn scoping_pins_tenant_and_employee() {
        let user = Uuid::new_v4();
        let scoped = TicketFilter::default().scoped(Role::Employee, 4, user).unwrap();
        assert_eq!(scoped.company_id, Some(4));
        assert_eq!(scoped.created_by, Some(user));

        let foreign = TicketFilter::for_company(9).scoped(Role::CompanyAdmin, 4, user);
        assert_eq!(foreign, Err(FilterError::ForeignCompany(9)));

        let global = TicketFilter::for_company(9).scoped(Role::SuperAdmin, 4, user).unwrap();
        assert_eq!(global.company_id, Some(9));
        assert_eq!(global.created_by, None);
    }

    #[test]
    fn query_pairs_use_wire_names() {
        let filter = TicketFilter {
            unassigned: Some(true),
            company_id: Some(2),
            status: Some(TicketStatus::InProgress),
            ..Default::default()
        };
        let pairs = filter.to_query();
        assert!(pairs.contains(&("unassigned", "true".to_string())));
        assert!(pairs.contains(&("companyId", "2".to_string())));
        assert!(pairs.contains(&("status", "In Progress".to_string())));
    }
}
