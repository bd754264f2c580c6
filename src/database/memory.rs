use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{Company, Technician, Ticket, User};
use crate::database::store::{HelpDeskStore, StoreError};
use crate::filter::TicketFilter;
use crate::types::CompanyId;

/// Process-local store used for development and tests
#[derive(Default)]
pub struct MemoryStore {
    tickets: RwLock<HashMap<Uuid, Ticket>>,
    technicians: RwLock<HashMap<Uuid, Technician>>,
    users: RwLock<HashMap<Uuid, User>>,
    companies: RwLock<HashMap<CompanyId, Company>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HelpDeskStore for MemoryStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list_tickets(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, StoreError> {
        let tickets = self.tickets.read().await;
        let mut found: Vec<Ticket> = tickets.values().filter(|t| filter.matches(t)).cloned().collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn get_ticket(&self, id: Uuid) -> Result<Option<Ticket>, StoreError> {
        Ok(self.tickets.read().await.get(&id).cloned())
    }

    async fn insert_ticket(&self, ticket: &Ticket) -> Result<(), StoreError> {
        let mut tickets = self.tickets.write().await;
        if tickets.contains_key(&ticket.id) {
            return Err(StoreError::Conflict(format!("ticket {} already exists", ticket.id)));
        }
        tickets.insert(ticket.id, ticket.clone());
        Ok(())
    }

    async fn update_ticket(&self, ticket: &Ticket) -> Result<(), StoreError> {
        let mut tickets = self.tickets.write().await;
        match tickets.get_mut(&ticket.id) {
            Some(existing) => {
                *existing = ticket.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("ticket {}", ticket.id))),
        }
    }

    async fn list_technicians(&self, company_id: Option<CompanyId>) -> Result<Vec<Technician>, StoreError> {
        let technicians = self.technicians.read().await;
        let mut found: Vec<Technician> = technicians
            .values()
            .filter(|t| company_id.map_or(true, |c| t.company_id == c))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn get_technician(&self, id: Uuid) -> Result<Option<Technician>, StoreError> {
        Ok(self.technicians.read().await.get(&id).cloned())
    }

    async fn save_technician(&self, technician: &Technician) -> Result<(), StoreError> {
        let mut stored = technician.clone();
        // Workload is derived per request, never stored
        stored.current_tickets = None;
        self.technicians.write().await.insert(stored.id, stored);
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = email.trim().to_lowercase();
        Ok(self.users.read().await.values().find(|u| u.email == email).cloned())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!("email {} already registered", user.email)));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn list_companies(&self) -> Result<Vec<Company>, StoreError> {
        let mut companies: Vec<Company> = self.companies.read().await.values().cloned().collect();
        companies.sort_by_key(|c| c.id);
        Ok(companies)
    }

    async fn get_company(&self, id: CompanyId) -> Result<Option<Company>, StoreError> {
        Ok(self.companies.read().await.get(&id).cloned())
    }

    async fn insert_company(&self, company: &Company) -> Result<(), StoreError> {
        let mut companies = self.companies.write().await;
        if companies.contains_key(&company.id) {
            return Err(StoreError::Conflict(format!("company {} already exists", company.id)));
        }
        companies.insert(company.id, company.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::types::{DutyStatus, Priority};
    use chrono::Duration;

    #[tokio::test]
    async fn lists_tickets_newest_first() {
        let store = MemoryStore::new();
        let creator = Uuid::new_v4();
        let mut older = Ticket::new("Old", "d", "Network", Priority::Low, 1, creator);
        older.created_at = older.created_at - Duration::hours(2);
        let newer = Ticket::new("New", "d", "Network", Priority::Low, 1, creator);
        store.insert_ticket(&older).await.unwrap();
        store.insert_ticket(&newer).await.unwrap();

        let all = store.list_tickets(&TicketFilter::default()).await.unwrap();
        assert_eq!(all.iter().map(|t| t.title.as_str()).collect::<Vec<_>>(), vec!["New", "Old"]);
    }

    #[tokio::test]
    async fn update_of_missing_ticket_is_not_found() {
        let store = MemoryStore::new();
        let ticket = Ticket::new("x", "y", "z", Priority::Low, 1, Uuid::new_v4());
        let err = store.update_ticket(&ticket).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn duplicate_email_and_company_conflict() {
        let store = MemoryStore::new();
        store.insert_user(&User::new("A", "a@x.et", "pw", Role::Employee, 1)).await.unwrap();
        let dup = store.insert_user(&User::new("B", "A@X.ET", "pw", Role::Employee, 1)).await;
        assert!(matches!(dup, Err(StoreError::Conflict(_))));

        store.insert_company(&Company::new(1, "One")).await.unwrap();
        assert!(matches!(store.insert_company(&Company::new(1, "Uno")).await, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn technicians_filtered_by_company_without_stored_workload() {
        let store = MemoryStore::new();
        let mut tech = Technician::new("Tigist", "t@x.et", "Network", 1, DutyStatus::Online);
        tech.current_tickets = Some(4);
        store.save_technician(&tech).await.unwrap();
        store
            .save_technician(&Technician::new("Dawit", "d@x.et", "IT Operations", 2, DutyStatus::OnSite))
            .await
            .unwrap();

        let company_one = store.list_technicians(Some(1)).await.unwrap();
        assert_eq!(company_one.len(), 1);
        assert_eq!(company_one[0].current_tickets, None);
        assert_eq!(store.list_technicians(None).await.unwrap().len(), 2);
    }
}
