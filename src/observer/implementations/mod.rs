// Hook implementations organized by stage
// Each stage handles a specific phase of ticket processing

use crate::observer::pipeline::TicketPipeline;
use crate::relay::RelayHub;

// Stage 1: Validation - required fields, value ranges
#[path = "1/required_fields.rs"]
pub mod required_fields;
#[path = "1/rating_range.rs"]
pub mod rating_range;

// Stage 3: Business - workflow rules, derived fields
#[path = "3/status_workflow.rs"]
pub mod status_workflow;
#[path = "3/assignment_status.rs"]
pub mod assignment_status;
#[path = "3/sla_deadline.rs"]
pub mod sla_deadline;
#[path = "3/touch_timestamps.rs"]
pub mod touch_timestamps;

// Stage 9: Notification - realtime fan-out
#[path = "9/relay_notifier.rs"]
pub mod relay_notifier;

pub use assignment_status::*;
pub use rating_range::*;
pub use relay_notifier::*;
pub use required_fields::*;
pub use sla_deadline::*;
pub use status_workflow::*;
pub use touch_timestamps::*;

/// Register every built-in hook
pub fn register_defaults(pipeline: &mut TicketPipeline, hub: RelayHub) {
    pipeline.register(Box::new(RequiredFields));
    pipeline.register(Box::new(RatingRange));
    pipeline.register(Box::new(StatusWorkflow));
    pipeline.register(Box::new(AssignmentStatus));
    pipeline.register(Box::new(SlaDeadline));
    pipeline.register(Box::new(TouchTimestamps));
    pipeline.register(Box::new(RelayNotifier::new(hub)));
}
