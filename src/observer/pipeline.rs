use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;

use crate::database::models::Ticket;
use crate::database::HelpDeskStore;
use crate::observer::context::{Actor, HookContext};
use crate::observer::error::HookError;
use crate::observer::implementations;
use crate::observer::traits::{HookStage, TicketHook};
use crate::relay::RelayHub;
use crate::types::Operation;

/// Runs ticket writes through Validation and Business hooks, persists the
/// result, then hands it to the Notification hooks.
pub struct TicketPipeline {
    store: Arc<dyn HelpDeskStore>,
    hooks: Vec<Box<dyn TicketHook>>,
}

impl TicketPipeline {
    /// Pipeline with no hooks; writes go straight to the store
    pub fn new(store: Arc<dyn HelpDeskStore>) -> Self {
        Self {
            store,
            hooks: Vec::new(),
        }
    }

    /// Pipeline with every built-in hook, notifying through `hub`
    pub fn with_defaults(store: Arc<dyn HelpDeskStore>, hub: RelayHub) -> Self {
        let mut pipeline = Self::new(store);
        implementations::register_defaults(&mut pipeline, hub);
        pipeline
    }

    /// Hooks stay ordered by stage, then priority, then registration order
    pub fn register(&mut self, hook: Box<dyn TicketHook>) {
        tracing::debug!("Registered hook '{}' for stage {:?}", hook.name(), hook.stage());
        self.hooks.push(hook);
        self.hooks.sort_by_key(|h| (h.stage(), h.priority()));
    }

    pub fn hook_names(&self) -> Vec<&'static str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }

    /// Process one write. `before` is the stored ticket for anything but a create.
    pub async fn run(
        &self,
        operation: Operation,
        actor: Actor,
        before: Option<Ticket>,
        ticket: Ticket,
    ) -> Result<Ticket, HookError> {
        let start_time = Instant::now();
        let mut ctx = HookContext::new(operation, actor, before, ticket);

        tracing::info!(
            "Ticket pipeline starting: operation={:?}, ticket={}, actor={}",
            ctx.operation,
            ctx.ticket.id,
            ctx.actor.name
        );

        for stage in HookStage::BEFORE_PERSIST {
            self.execute_stage(stage, &mut ctx).await;
            if !ctx.errors.is_empty() {
                tracing::warn!("Ticket pipeline stopped at stage {:?}", stage);
                return Err(ctx.errors.remove(0));
            }
        }

        match ctx.operation {
            Operation::Create => self.store.insert_ticket(&ctx.ticket).await?,
            _ => self.store.update_ticket(&ctx.ticket).await?,
        }

        // Failures past this point are logged, the write already happened
        self.execute_stage(HookStage::Notification, &mut ctx).await;
        for error in ctx.errors.drain(..) {
            tracing::warn!("Notification hook failed for ticket {}: {}", ctx.ticket.id, error);
        }

        tracing::debug!("Ticket pipeline finished in {:?}", start_time.elapsed());
        Ok(ctx.ticket)
    }

    async fn execute_stage(&self, stage: HookStage, ctx: &mut HookContext) {
        for hook in self.hooks.iter().filter(|h| h.stage() == stage) {
            if !hook.applies_to(ctx.operation) {
                tracing::trace!("Hook {} skipped for {:?}", hook.name(), ctx.operation);
                continue;
            }

            let hook_start = Instant::now();
            match timeout(hook.timeout(), hook.execute(ctx)).await {
                Ok(Ok(())) => {
                    tracing::debug!("Hook {} completed in {:?}", hook.name(), hook_start.elapsed());
                }
                Ok(Err(error)) => {
                    tracing::debug!("Hook {} rejected the write: {}", hook.name(), error);
                    ctx.errors.push(error);
                }
                Err(_) => {
                    tracing::error!("Hook {} timed out after {:?}", hook.name(), hook.timeout());
                    ctx.errors.push(HookError::Timeout(hook.name()));
                }
            }

            if stage.is_blocking() && !ctx.errors.is_empty() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::database::MemoryStore;
    use crate::types::{Priority, TicketStatus};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use uuid::Uuid;

    fn actor(role: Role) -> Actor {
        Actor {
            user_id: Uuid::new_v4(),
            name: "tester".into(),
            role,
            company_id: 1,
        }
    }

    fn ticket() -> Ticket {
        Ticket::new("Printer jam", "Tray 2 is stuck", "Hardware", Priority::High, 1, Uuid::new_v4())
    }

    struct Counting(Arc<AtomicUsize>, HookStage);

    #[async_trait]
    impl TicketHook for Counting {
        fn name(&self) -> &'static str {
            "Counting"
        }
        fn stage(&self) -> HookStage {
            self.1
        }
        fn applies_to(&self, _op: Operation) -> bool {
            true
        }
        async fn execute(&self, _ctx: &mut HookContext) -> Result<(), HookError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Slow;

    #[async_trait]
    impl TicketHook for Slow {
        fn name(&self) -> &'static str {
            "Slow"
        }
        fn stage(&self) -> HookStage {
            HookStage::Business
        }
        fn applies_to(&self, _op: Operation) -> bool {
            true
        }
        fn timeout(&self) -> Duration {
            Duration::from_millis(10)
        }
        async fn execute(&self, _ctx: &mut HookContext) -> Result<(), HookError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn creates_are_persisted_with_sla_and_new_status() {
        let store = Arc::new(MemoryStore::new());
        let pipeline = TicketPipeline::with_defaults(store.clone(), RelayHub::new(8));

        let saved = pipeline.run(Operation::Create, actor(Role::Employee), None, ticket()).await.unwrap();
        assert_eq!(saved.status, TicketStatus::New);
        assert!(saved.sla_due_at.is_some());
        assert_eq!(store.get_ticket(saved.id).await.unwrap(), Some(saved));
    }

    #[tokio::test]
    async fn validation_failures_stop_before_persistence() {
        let store = Arc::new(MemoryStore::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let mut pipeline = TicketPipeline::with_defaults(store.clone(), RelayHub::new(8));
        pipeline.register(Box::new(Counting(calls.clone(), HookStage::Business)));

        let mut bad = ticket();
        bad.title = "   ".into();
        let err = pipeline.run(Operation::Create, actor(Role::Employee), None, bad.clone()).await.unwrap_err();

        assert!(matches!(err, HookError::Validation { field: "title", .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(store.get_ticket(bad.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn slow_hooks_time_out() {
        let store = Arc::new(MemoryStore::new());
        let mut pipeline = TicketPipeline::new(store);
        pipeline.register(Box::new(Slow));

        let err = pipeline.run(Operation::Create, actor(Role::Employee), None, ticket()).await.unwrap_err();
        assert!(matches!(err, HookError::Timeout("Slow")));
    }

    #[tokio::test]
    async fn notification_hooks_run_after_persistence() {
        let store = Arc::new(MemoryStore::new());
        let hub = RelayHub::new(8);
        let mut room = hub.subscribe(1).await;
        let pipeline = TicketPipeline::with_defaults(store, hub);

        let saved = pipeline.run(Operation::Create, actor(Role::Employee), None, ticket()).await.unwrap();
        match room.room.recv().await.unwrap() {
            crate::relay::RelayEvent::TicketCreated(t) => assert_eq!(t.id, saved.id),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn hooks_are_ordered_by_stage() {
        let mut pipeline = TicketPipeline::new(Arc::new(MemoryStore::new()));
        let calls = Arc::new(AtomicUsize::new(0));
        pipeline.register(Box::new(Counting(calls.clone(), HookStage::Notification)));
        pipeline.register(Box::new(Slow));
        assert_eq!(pipeline.hook_names(), vec!["Slow", "Counting"]);
    }
}
