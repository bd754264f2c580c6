use clap::{ArgGroup, Subcommand};
use serde_json::json;

use crate::api::BroadcastRequest;
use crate::auth::Role;
use crate::cli::commands::signed_in;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::client::AppContext;
use crate::relay::BroadcastTarget;
use crate::types::CompanyId;

#[derive(Subcommand)]
pub enum BroadcastCommands {
    #[command(about = "Send an announcement")]
    #[command(group(ArgGroup::new("audience").args(["all", "company", "role"])))]
    Send {
        #[arg(help = "Announcement text")]
        message: String,
        #[arg(long, help = "Everyone on every tenant")]
        all: bool,
        #[arg(long, help = "One company (defaults to yours)")]
        company: Option<CompanyId>,
        #[arg(long, help = "One role: employee, technician, admin, ...")]
        role: Option<Role>,
    },
}

/// No audience flag means the sender's own company
pub(crate) fn target(all: bool, company: Option<CompanyId>, role: Option<Role>, home: CompanyId) -> BroadcastTarget {
    if all {
        BroadcastTarget::All
    } else if let Some(role) = role {
        BroadcastTarget::Role(role)
    } else {
        BroadcastTarget::Company(company.unwrap_or(home))
    }
}

pub async fn handle(cmd: BroadcastCommands, context: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = signed_in(context)?;

    match cmd {
        BroadcastCommands::Send {
            message,
            all,
            company,
            role,
        } => {
            let home = context.user.as_ref().map(|u| u.company_id).unwrap_or_default();
            let request = BroadcastRequest {
                message,
                target: target(all, company, role, home),
            };
            let receipt = client.broadcast(&request).await?;
            output_success(
                &output_format,
                &format!("Broadcast delivered to {} live session(s)", receipt.delivered),
                Some(json!({ "broadcast": receipt })),
            )
        }
    }
}
