pub mod auth;
pub mod broadcast;
pub mod companies;
pub mod stats;
pub mod suggest;
pub mod technicians;
pub mod tickets;
pub mod watch;

use crate::client::{AppContext, HelpDeskClient};

/// API client for commands that need a signed-in session
pub(crate) fn signed_in(context: &AppContext) -> anyhow::Result<HelpDeskClient> {
    if !context.is_authenticated() {
        anyhow::bail!("Not logged in. Run `mesob login <email>` first");
    }
    context.client()
}
