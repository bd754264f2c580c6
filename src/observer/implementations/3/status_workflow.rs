// Stage 3: Business - ticket lifecycle rules
use async_trait::async_trait;

use crate::observer::context::HookContext;
use crate::observer::error::HookError;
use crate::observer::traits::{HookStage, TicketHook};
use crate::types::{Operation, TicketStatus};

/// Closed is terminal, work needs a technician, and resolution is timestamped.
/// Only resolved or closed tickets can be rated.
#[derive(Default)]
pub struct StatusWorkflow;

#[async_trait]
impl TicketHook for StatusWorkflow {
    fn name(&self) -> &'static str {
        "StatusWorkflow"
    }

    fn stage(&self) -> HookStage {
        HookStage::Business
    }

    fn applies_to(&self, op: Operation) -> bool {
        matches!(op, Operation::Update | Operation::Assign | Operation::Rate)
    }

    fn priority(&self) -> u8 {
        10
    }

    async fn execute(&self, ctx: &mut HookContext) -> Result<(), HookError> {
        let previous = ctx.before.as_ref().map(|t| t.status);

        if ctx.operation == Operation::Rate {
            return match previous {
                Some(TicketStatus::Resolved | TicketStatus::Closed) => Ok(()),
                _ => Err(HookError::Conflict(
                    "Only resolved or closed tickets can be rated".to_string(),
                )),
            };
        }

        if previous == Some(TicketStatus::Closed) {
            return Err(HookError::Conflict("Closed tickets cannot be changed".to_string()));
        }

        let ticket = &mut ctx.ticket;
        if matches!(ticket.status, TicketStatus::Assigned | TicketStatus::InProgress) && ticket.technician.is_none() {
            return Err(HookError::validation(
                "status",
                format!("A ticket needs a technician before it can be {}", ticket.status),
            ));
        }

        match ticket.status {
            TicketStatus::Resolved | TicketStatus::Closed => {
                ticket.resolved_at.get_or_insert(ctx.now);
            }
            _ => ticket.resolved_at = None,
        }
        Ok(())
    }
}
