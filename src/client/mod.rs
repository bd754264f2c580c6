// Client side of the help desk: HTTP API access, the relay mailbox, the
// ticket cache the relay keeps warm, and the persisted session context.

pub mod api;
pub mod cache;
pub mod context;
pub mod relay;

pub use api::{ClientError, HelpDeskClient};
pub use cache::QueryCache;
pub use context::AppContext;
pub use relay::{RelayClient, RelayError, RelayIdentity, RelaySession};
