use std::sync::Arc;

use crate::database::HelpDeskStore;
use crate::observer::TicketPipeline;
use crate::relay::RelayHub;

/// Shared handles every handler gets through `State`
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn HelpDeskStore>,
    pub relay: RelayHub,
    pub pipeline: Arc<TicketPipeline>,
}

impl AppState {
    /// Wire the default hook pipeline to `relay`
    pub fn new(store: Arc<dyn HelpDeskStore>, relay: RelayHub) -> Self {
        let pipeline = Arc::new(TicketPipeline::with_defaults(store.clone(), relay.clone()));
        Self { store, relay, pipeline }
    }
}
