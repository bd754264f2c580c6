// Stage 9: Notification - push the stored ticket to its tenant room
use async_trait::async_trait;

use crate::observer::context::HookContext;
use crate::observer::error::HookError;
use crate::observer::traits::{HookStage, TicketHook};
use crate::relay::{RelayEvent, RelayHub};
use crate::types::Operation;

pub struct RelayNotifier {
    hub: RelayHub,
}

impl RelayNotifier {
    pub fn new(hub: RelayHub) -> Self {
        Self { hub }
    }
}

#[async_trait]
impl TicketHook for RelayNotifier {
    fn name(&self) -> &'static str {
        "RelayNotifier"
    }

    fn stage(&self) -> HookStage {
        HookStage::Notification
    }

    fn applies_to(&self, _op: Operation) -> bool {
        true
    }

    async fn execute(&self, ctx: &mut HookContext) -> Result<(), HookError> {
        let ticket = ctx.ticket.clone();
        let company_id = ticket.company_id;
        let event = match ctx.operation {
            Operation::Create => RelayEvent::TicketCreated(ticket),
            _ => RelayEvent::TicketUpdated(ticket),
        };

        let name = event.name();
        let delivered = self.hub.publish(company_id, event).await;
        tracing::debug!("Relayed {} for company {} to {} sessions", name, company_id, delivered);
        Ok(())
    }
}
