// Stage 3: Business - due time from priority
use async_trait::async_trait;
use chrono::Duration;

use crate::config;
use crate::observer::context::HookContext;
use crate::observer::error::HookError;
use crate::observer::traits::{HookStage, TicketHook};
use crate::types::Operation;

/// Sets `slaDueAt` on create and whenever the priority changes.
/// The clock always starts at `createdAt`.
#[derive(Default)]
pub struct SlaDeadline;

#[async_trait]
impl TicketHook for SlaDeadline {
    fn name(&self) -> &'static str {
        "SlaDeadline"
    }

    fn stage(&self) -> HookStage {
        HookStage::Business
    }

    fn applies_to(&self, op: Operation) -> bool {
        matches!(op, Operation::Create | Operation::Update)
    }

    fn priority(&self) -> u8 {
        30
    }

    async fn execute(&self, ctx: &mut HookContext) -> Result<(), HookError> {
        if ctx.operation == Operation::Update && !ctx.changed(|t| t.priority) {
            return Ok(());
        }

        let hours = config::config().sla.hours_for(ctx.ticket.priority);
        ctx.ticket.sla_due_at = Some(ctx.ticket.created_at + Duration::hours(hours));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::database::models::Ticket;
    use crate::observer::context::Actor;
    use crate::types::Priority;
    use uuid::Uuid;

    fn actor() -> Actor {
        Actor {
            user_id: Uuid::new_v4(),
            name: "tester".into(),
            role: Role::Employee,
            company_id: 1,
        }
    }

    #[tokio::test]
    async fn deadline_follows_priority() {
        let ticket = Ticket::new("t", "d", "Network", Priority::Critical, 1, Uuid::new_v4());
        let mut ctx = HookContext::new(Operation::Create, actor(), None, ticket);
        SlaDeadline.execute(&mut ctx).await.unwrap();

        let hours = config::config().sla.hours_for(Priority::Critical);
        assert_eq!(ctx.ticket.sla_due_at, Some(ctx.ticket.created_at + Duration::hours(hours)));
    }

    #[tokio::test]
    async fn unchanged_priority_keeps_the_deadline() {
        let mut stored = Ticket::new("t", "d", "Network", Priority::Low, 1, Uuid::new_v4());
        stored.sla_due_at = Some(stored.created_at);
        let mut ctx = HookContext::new(Operation::Update, actor(), Some(stored.clone()), stored.clone());
        SlaDeadline.execute(&mut ctx).await.unwrap();
        assert_eq!(ctx.ticket.sla_due_at, stored.sla_due_at);

        ctx.ticket.priority = Priority::High;
        SlaDeadline.execute(&mut ctx).await.unwrap();
        assert_ne!(ctx.ticket.sla_due_at, stored.sla_due_at);
    }
}
