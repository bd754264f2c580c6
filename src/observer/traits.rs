use async_trait::async_trait;
use std::time::Duration;

use crate::observer::context::HookContext;
use crate::observer::error::HookError;
use crate::types::Operation;

/// Hook stages with semantic meaning. Validation and Business run before the
/// ticket is persisted and can veto it; Notification runs after and cannot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum HookStage {
    Validation = 1,   // Required fields, value ranges
    Business = 3,     // Workflow rules, derived fields
    Notification = 9, // Realtime fan-out
}

impl HookStage {
    pub const BEFORE_PERSIST: [HookStage; 2] = [HookStage::Validation, HookStage::Business];

    /// Check if failures in this stage abort the write
    pub fn is_blocking(&self) -> bool {
        (*self as u8) < (HookStage::Notification as u8)
    }
}

/// A unit of ticket processing registered with the pipeline
#[async_trait]
pub trait TicketHook: Send + Sync {
    /// Hook name for logging and debugging
    fn name(&self) -> &'static str;

    /// Which stage this hook belongs to
    fn stage(&self) -> HookStage;

    /// Check if hook applies to this operation
    fn applies_to(&self, op: Operation) -> bool;

    /// Priority within stage (lower numbers execute first)
    fn priority(&self) -> u8 {
        50
    }

    /// Execution timeout (default 5 seconds)
    fn timeout(&self) -> Duration {
        Duration::from_secs(5)
    }

    async fn execute(&self, ctx: &mut HookContext) -> Result<(), HookError>;
}
