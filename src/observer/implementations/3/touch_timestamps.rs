// Stage 3: Business - keep createdAt stable and bump updatedAt
use async_trait::async_trait;

use crate::observer::context::HookContext;
use crate::observer::error::HookError;
use crate::observer::traits::{HookStage, TicketHook};
use crate::types::Operation;

#[derive(Default)]
pub struct TouchTimestamps;

#[async_trait]
impl TicketHook for TouchTimestamps {
    fn name(&self) -> &'static str {
        "TouchTimestamps"
    }

    fn stage(&self) -> HookStage {
        HookStage::Business
    }

    fn applies_to(&self, _op: Operation) -> bool {
        true
    }

    // First in stage so later hooks see final timestamps
    fn priority(&self) -> u8 {
        1
    }

    async fn execute(&self, ctx: &mut HookContext) -> Result<(), HookError> {
        match &ctx.before {
            Some(before) => {
                ctx.ticket.id = before.id;
                ctx.ticket.company_id = before.company_id;
                ctx.ticket.created_by = before.created_by;
                ctx.ticket.created_at = before.created_at;
            }
            None => ctx.ticket.created_at = ctx.now,
        }
        ctx.ticket.updated_at = ctx.now;
        Ok(())
    }
}
