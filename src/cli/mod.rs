pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::client::AppContext;

#[derive(Parser)]
#[command(name = "mesob")]
#[command(about = "Mesob CLI - Command-line client for the Mesob Help Desk")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, env = "MESOB_SERVER_URL", help = "Server URL (defaults to the saved session)")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Sign in and save the session")]
    Login {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, env = "MESOB_PASSWORD", hide_env_values = true, help = "Password")]
        password: String,
    },

    #[command(about = "Forget the saved session")]
    Logout,

    #[command(about = "Show the signed-in user")]
    Whoami,

    #[command(about = "Ticket operations")]
    Tickets {
        #[command(subcommand)]
        cmd: commands::tickets::TicketCommands,
    },

    #[command(about = "Technician roster and duty status")]
    Technicians {
        #[command(subcommand)]
        cmd: commands::technicians::TechnicianCommands,
    },

    #[command(about = "Recommend technicians for unassigned tickets")]
    Suggest {
        #[arg(long, help = "Company to look at (global admins only)")]
        company: Option<i64>,
    },

    #[command(about = "Announcements to connected users")]
    Broadcast {
        #[command(subcommand)]
        cmd: commands::broadcast::BroadcastCommands,
    },

    #[command(about = "Dashboard statistics")]
    Stats {
        #[arg(long, help = "Company to look at (global admins only)")]
        company: Option<i64>,
    },

    #[command(about = "Company registry")]
    Companies {
        #[command(subcommand)]
        cmd: commands::companies::CompanyCommands,
    },

    #[command(about = "Follow tickets and announcements live")]
    Watch(commands::watch::WatchArgs),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let mut context = AppContext::load()?;
    if let Some(server) = &cli.server {
        context.server_url = server.clone();
    }

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&mut context, &email, &password, output_format).await
        }
        Commands::Logout => commands::auth::logout(&mut context, output_format),
        Commands::Whoami => commands::auth::whoami(&context, output_format).await,
        Commands::Tickets { cmd } => commands::tickets::handle(cmd, &context, output_format).await,
        Commands::Technicians { cmd } => commands::technicians::handle(cmd, &context, output_format).await,
        Commands::Suggest { company } => commands::suggest::handle(company, &context, output_format).await,
        Commands::Broadcast { cmd } => commands::broadcast::handle(cmd, &context, output_format).await,
        Commands::Stats { company } => commands::stats::handle(company, &context, output_format).await,
        Commands::Companies { cmd } => commands::companies::handle(cmd, &context, output_format).await,
        Commands::Watch(args) => commands::watch::handle(args, &context, output_format).await,
    }
}
