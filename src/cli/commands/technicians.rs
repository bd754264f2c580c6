use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::api::TechnicianQuery;
use crate::cli::commands::signed_in;
use crate::cli::utils::{output_empty_collection, output_success, output_value, technician_line};
use crate::cli::OutputFormat;
use crate::client::AppContext;
use crate::types::{CompanyId, DutyStatus};

#[derive(Subcommand)]
pub enum TechnicianCommands {
    #[command(about = "List technicians")]
    List {
        #[arg(long, help = "Include open ticket counts")]
        workload: bool,
        #[arg(long)]
        company: Option<CompanyId>,
    },

    #[command(about = "Set duty status: online, on-site, break or offline")]
    Duty {
        #[arg(help = "Duty status")]
        status: DutyStatus,
        #[arg(long, help = "Technician id (defaults to yourself)")]
        technician: Option<Uuid>,
    },
}

pub async fn handle(cmd: TechnicianCommands, context: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = signed_in(context)?;

    match cmd {
        TechnicianCommands::List { workload, company } => {
            let query = TechnicianQuery {
                include_workload: workload.then_some(true),
                company_id: company,
            };
            let technicians = client.list_technicians(&query).await?;
            if technicians.is_empty() {
                return output_empty_collection(&output_format, "technicians", "No technicians found");
            }
            output_value(&output_format, &technicians, |technicians| {
                for technician in technicians {
                    println!("{}", technician_line(technician));
                }
            })
        }
        TechnicianCommands::Duty { status, technician } => {
            let id = technician
                .or_else(|| context.user.as_ref().and_then(|u| u.technician_id))
                .ok_or_else(|| anyhow::anyhow!("You are not a technician; pass --technician"))?;
            let technician = client.set_duty(id, status).await?;
            output_success(
                &output_format,
                &format!("{} is now {}", technician.name, technician.duty_status),
                Some(json!({ "technician": technician })),
            )
        }
    }
}
