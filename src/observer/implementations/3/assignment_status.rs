// Stage 3: Business - assigning a new ticket moves it to Assigned
use async_trait::async_trait;

use crate::observer::context::HookContext;
use crate::observer::error::HookError;
use crate::observer::traits::{HookStage, TicketHook};
use crate::types::{Operation, TicketStatus};

#[derive(Default)]
pub struct AssignmentStatus;

#[async_trait]
impl TicketHook for AssignmentStatus {
    fn name(&self) -> &'static str {
        "AssignmentStatus"
    }

    fn stage(&self) -> HookStage {
        HookStage::Business
    }

    fn applies_to(&self, op: Operation) -> bool {
        op == Operation::Assign
    }

    fn priority(&self) -> u8 {
        20
    }

    async fn execute(&self, ctx: &mut HookContext) -> Result<(), HookError> {
        if ctx.ticket.technician.is_none() {
            return Err(HookError::validation("technicianId", "A technician is required"));
        }
        if ctx.ticket.status == TicketStatus::New {
            ctx.ticket.status = TicketStatus::Assigned;
        }
        Ok(())
    }
}
