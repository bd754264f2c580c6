use std::collections::HashMap;

use crate::database::models::Ticket;
use crate::filter::TicketFilter;
use crate::relay::{BroadcastMessage, RelayEvent, Viewer};

/// Newest announcements kept for display
pub const MAX_NOTIFICATIONS: usize = 50;

/// Ticket lists keyed by the query that produced them, plus the
/// notification feed. Poll refetches and relay events both write here;
/// whichever lands last wins.
#[derive(Debug, Default)]
pub struct QueryCache {
    lists: HashMap<TicketFilter, Vec<Ticket>>,
    notifications: Vec<BroadcastMessage>,
    viewer: Option<Viewer>,
}

impl QueryCache {
    pub fn new(viewer: Option<Viewer>) -> Self {
        Self {
            viewer,
            ..Default::default()
        }
    }

    pub fn set_viewer(&mut self, viewer: Option<Viewer>) {
        self.viewer = viewer;
    }

    /// Store a fresh fetch result
    pub fn replace(&mut self, key: TicketFilter, tickets: Vec<Ticket>) {
        self.lists.insert(key, tickets);
    }

    pub fn get(&self, key: &TicketFilter) -> Option<&[Ticket]> {
        self.lists.get(key).map(Vec::as_slice)
    }

    pub fn notifications(&self) -> &[BroadcastMessage] {
        &self.notifications
    }

    pub fn clear(&mut self) {
        self.lists.clear();
        self.notifications.clear();
    }

    /// Fold one relay event into the cache. Returns whether anything changed.
    pub fn apply(&mut self, event: &RelayEvent) -> bool {
        match event {
            RelayEvent::TicketCreated(ticket) => self.insert_created(ticket),
            RelayEvent::TicketUpdated(ticket) => self.merge_updated(ticket),
            RelayEvent::BroadcastMessage(message) => self.push_notification(message),
        }
    }

    fn insert_created(&mut self, ticket: &Ticket) -> bool {
        let mut changed = false;
        for (key, list) in self.lists.iter_mut() {
            if !key.matches(ticket) {
                continue;
            }
            list.retain(|t| t.id != ticket.id);
            list.insert(0, ticket.clone());
            changed = true;
        }
        changed
    }

    fn merge_updated(&mut self, ticket: &Ticket) -> bool {
        let mut changed = false;
        for list in self.lists.values_mut() {
            if let Some(slot) = list.iter_mut().find(|t| t.id == ticket.id) {
                *slot = ticket.clone();
                changed = true;
            }
        }
        changed
    }

    fn push_notification(&mut self, message: &BroadcastMessage) -> bool {
        if let Some(viewer) = &self.viewer {
            if !message.reaches(viewer) {
                return false;
            }
        }
        if self.notifications.iter().any(|m| m.id == message.id) {
            return false;
        }
        self.notifications.insert(0, message.clone());
        self.notifications.truncate(MAX_NOTIFICATIONS);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::relay::BroadcastTarget;
    use crate::types::{Priority, TicketStatus};
    use uuid::Uuid;

    fn ticket(company_id: i64) -> Ticket {
        Ticket::new("VPN down", "Cannot connect", "Network", Priority::High, company_id, Uuid::new_v4())
    }

    #[test]
    fn created_tickets_land_at_the_head_once() {
        let mut cache = QueryCache::new(None);
        let key = TicketFilter::for_company(1);
        let existing = ticket(1);
        cache.replace(key.clone(), vec![existing.clone()]);

        let fresh = ticket(1);
        assert!(cache.apply(&RelayEvent::TicketCreated(fresh.clone())));
        assert!(cache.apply(&RelayEvent::TicketCreated(fresh.clone())));

        let list = cache.get(&key).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, fresh.id);
        assert_eq!(list.iter().filter(|t| t.id == fresh.id).count(), 1);
    }

    #[test]
    fn created_tickets_skip_lists_that_do_not_match() {
        let mut cache = QueryCache::new(None);
        let other = TicketFilter::for_company(2);
        cache.replace(other.clone(), vec![]);

        assert!(!cache.apply(&RelayEvent::TicketCreated(ticket(1))));
        assert!(cache.get(&other).unwrap().is_empty());
    }

    #[test]
    fn updates_for_unknown_ids_leave_the_cache_alone() {
        let mut cache = QueryCache::new(None);
        let key = TicketFilter::for_company(1);
        let cached = vec![ticket(1), ticket(1)];
        cache.replace(key.clone(), cached.clone());

        assert!(!cache.apply(&RelayEvent::TicketUpdated(ticket(1))));
        assert_eq!(cache.get(&key).unwrap(), cached.as_slice());
    }

    #[test]
    fn updates_merge_by_id_in_place() {
        let mut cache = QueryCache::new(None);
        let key = TicketFilter::default();
        let first = ticket(1);
        let second = ticket(1);
        cache.replace(key.clone(), vec![first.clone(), second.clone()]);

        let mut changed = second.clone();
        changed.status = TicketStatus::Resolved;
        assert!(cache.apply(&RelayEvent::TicketUpdated(changed)));

        let list = cache.get(&key).unwrap();
        assert_eq!(list[0], first);
        assert_eq!(list[1].status, TicketStatus::Resolved);
    }

    #[test]
    fn notifications_are_filtered_for_the_viewer() {
        let viewer = Viewer {
            user_id: Uuid::new_v4(),
            company_id: 1,
            role: Role::Employee,
        };
        let mut cache = QueryCache::new(Some(viewer));

        let everyone = BroadcastMessage::new("Office closed Friday", BroadcastTarget::All, "IT");
        let other_company = BroadcastMessage::new("Abay only", BroadcastTarget::Company(2), "IT");
        let technicians = BroadcastMessage::new("Stand-up", BroadcastTarget::Role(Role::Technician), "IT");

        assert!(cache.apply(&RelayEvent::BroadcastMessage(everyone.clone())));
        assert!(!cache.apply(&RelayEvent::BroadcastMessage(other_company)));
        assert!(!cache.apply(&RelayEvent::BroadcastMessage(technicians)));
        assert!(!cache.apply(&RelayEvent::BroadcastMessage(everyone.clone())));
        assert_eq!(cache.notifications(), &[everyone]);
    }

    #[test]
    fn last_write_wins_between_poll_and_relay() {
        let mut cache = QueryCache::new(None);
        let key = TicketFilter::default();
        cache.apply(&RelayEvent::TicketCreated(ticket(1)));
        cache.replace(key.clone(), vec![]);
        assert!(cache.get(&key).unwrap().is_empty());
    }
}
