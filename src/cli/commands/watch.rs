use clap::Args;
use std::time::Duration;

use crate::cli::commands::signed_in;
use crate::cli::commands::tickets::ListArgs;
use crate::cli::utils::{short_id, ticket_line};
use crate::cli::OutputFormat;
use crate::client::{AppContext, HelpDeskClient, QueryCache, RelayIdentity, RelaySession};
use crate::config;
use crate::filter::TicketFilter;
use crate::relay::{RelayEvent, Viewer};
use crate::types::CompanyId;

#[derive(Args)]
pub struct WatchArgs {
    #[command(flatten)]
    pub list: ListArgs,

    #[arg(long, help = "Relay room to join (global admins; defaults to your company)")]
    pub room: Option<CompanyId>,

    #[arg(long, help = "Seconds between refetches (defaults to the configured poll interval)")]
    pub interval: Option<u64>,
}

/// Relay events and periodic refetches both feed one cache; whichever
/// writes last wins.
struct Watcher {
    client: HelpDeskClient,
    identity: Option<RelayIdentity>,
    session: RelaySession,
    cache: QueryCache,
    filter: TicketFilter,
    output_format: OutputFormat,
}

impl Watcher {
    async fn refetch(&mut self) {
        match self.client.list_tickets(&self.filter).await {
            Ok(tickets) => {
                tracing::debug!("Refetched {} tickets", tickets.len());
                self.cache.replace(self.filter.clone(), tickets);
            }
            Err(e) => tracing::warn!("Refetch failed, keeping cached tickets: {}", e),
        }

        if let Some(identity) = &self.identity {
            self.session.ensure(identity).await;
        }
    }

    fn pump(&mut self) -> anyhow::Result<()> {
        for event in self.session.drain() {
            if self.cache.apply(&event) {
                self.show(&event)?;
            }
        }
        Ok(())
    }

    fn show(&self, event: &RelayEvent) -> anyhow::Result<()> {
        match self.output_format {
            OutputFormat::Json => println!("{}", serde_json::to_string(event)?),
            OutputFormat::Text => match event {
                RelayEvent::TicketCreated(ticket) => println!("+ {}", ticket_line(ticket)),
                RelayEvent::TicketUpdated(ticket) => println!("~ {}", ticket_line(ticket)),
                RelayEvent::BroadcastMessage(message) => println!(
                    "! [{}] {}: {}",
                    short_id(&message.id.to_string()),
                    message.sender,
                    message.message
                ),
            },
        }
        Ok(())
    }

    fn show_list(&self) -> anyhow::Result<()> {
        let tickets = self.cache.get(&self.filter).unwrap_or(&[]);
        match self.output_format {
            OutputFormat::Json => println!("{}", serde_json::to_string(tickets)?),
            OutputFormat::Text => {
                println!("{} ticket(s)", tickets.len());
                for ticket in tickets {
                    println!("  {}", ticket_line(ticket));
                }
            }
        }
        Ok(())
    }
}

/// Broadcast filtering follows the joined room, not the home company
fn room_viewer(context: &AppContext, room: Option<CompanyId>) -> Option<Viewer> {
    match room {
        Some(room) => context.viewer_in(room),
        None => context.viewer(),
    }
}

pub async fn handle(args: WatchArgs, context: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = signed_in(context)?;

    let room = args.room.or_else(|| context.user.as_ref().map(|u| u.company_id));
    let identity = match (room, client.relay_url()) {
        (Some(company_id), Ok(url)) => Some(RelayIdentity { url, company_id }),
        _ => None,
    };

    let mut watcher = Watcher {
        client,
        identity,
        session: RelaySession::new(),
        cache: QueryCache::new(room_viewer(context, room)),
        filter: args.list.filter(),
        output_format,
    };

    let poll_secs = args.interval.unwrap_or(config::config().client.poll_interval_secs).max(1);
    let mut poll = tokio::time::interval(Duration::from_secs(poll_secs));
    let mut drain = tokio::time::interval(Duration::from_millis(500));

    watcher.refetch().await;
    watcher.show_list()?;
    if !watcher.session.is_connected() {
        tracing::warn!("Watching in poll-only mode every {}s", poll_secs);
    }

    // The first tick of each interval fires immediately
    poll.tick().await;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = poll.tick() => {
                watcher.refetch().await;
                watcher.pump()?;
            }
            _ = drain.tick() => watcher.pump()?,
        }
    }

    watcher.session.disconnect();
    tracing::info!("Stopped watching");
    Ok(())
}
