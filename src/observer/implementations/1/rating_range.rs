// Stage 1: Validation - ratings are whole stars from 1 to 5
use async_trait::async_trait;

use crate::observer::context::HookContext;
use crate::observer::error::HookError;
use crate::observer::traits::{HookStage, TicketHook};
use crate::types::Operation;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Default)]
pub struct RatingRange;

#[async_trait]
impl TicketHook for RatingRange {
    fn name(&self) -> &'static str {
        "RatingRange"
    }

    fn stage(&self) -> HookStage {
        HookStage::Validation
    }

    fn applies_to(&self, op: Operation) -> bool {
        op == Operation::Rate
    }

    async fn execute(&self, ctx: &mut HookContext) -> Result<(), HookError> {
        match ctx.ticket.rating {
            Some(rating) if (MIN_RATING..=MAX_RATING).contains(&rating) => {}
            _ => {
                return Err(HookError::validation(
                    "rating",
                    format!("Rating must be between {} and {}", MIN_RATING, MAX_RATING),
                ))
            }
        }

        if let Some(feedback) = ctx.ticket.feedback.take() {
            let feedback = feedback.trim();
            ctx.ticket.feedback = (!feedback.is_empty()).then(|| feedback.to_string());
        }
        Ok(())
    }
}
