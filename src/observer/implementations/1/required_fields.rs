// Stage 1: Validation - title, description and category must be present
use async_trait::async_trait;

use crate::observer::context::HookContext;
use crate::observer::error::HookError;
use crate::observer::traits::{HookStage, TicketHook};
use crate::types::Operation;

#[derive(Default)]
pub struct RequiredFields;

#[async_trait]
impl TicketHook for RequiredFields {
    fn name(&self) -> &'static str {
        "RequiredFields"
    }

    fn stage(&self) -> HookStage {
        HookStage::Validation
    }

    fn applies_to(&self, op: Operation) -> bool {
        matches!(op, Operation::Create | Operation::Update)
    }

    fn priority(&self) -> u8 {
        10
    }

    async fn execute(&self, ctx: &mut HookContext) -> Result<(), HookError> {
        let ticket = &mut ctx.ticket;
        ticket.title = ticket.title.trim().to_string();
        ticket.category = ticket.category.trim().to_string();

        if ticket.title.is_empty() {
            return Err(HookError::validation("title", "Title is required"));
        }
        if ticket.description.trim().is_empty() {
            return Err(HookError::validation("description", "Description is required"));
        }
        if ticket.category.is_empty() {
            return Err(HookError::validation("category", "Category is required"));
        }
        Ok(())
    }
}
