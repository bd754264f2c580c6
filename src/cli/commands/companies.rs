use clap::Subcommand;
use serde_json::json;

use crate::api::CreateCompanyRequest;
use crate::cli::commands::signed_in;
use crate::cli::utils::output_success;
use crate::cli::utils::output_value;
use crate::cli::OutputFormat;
use crate::client::AppContext;
use crate::types::CompanyId;

#[derive(Subcommand)]
pub enum CompanyCommands {
    #[command(about = "List companies you can see")]
    List,

    #[command(about = "Register a company (system admins)")]
    Create {
        #[arg(help = "Company name")]
        name: String,
        #[arg(long, help = "Company id (next free id when omitted)")]
        id: Option<CompanyId>,
    },
}

pub async fn handle(cmd: CompanyCommands, context: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = signed_in(context)?;

    match cmd {
        CompanyCommands::List => {
            let companies = client.companies().await?;
            output_value(&output_format, &companies, |companies| {
                for company in companies {
                    println!("{:>4}  {:<6} {}", company.id, company.initials, company.name);
                }
            })
        }
        CompanyCommands::Create { name, id } => {
            let company = client.create_company(&CreateCompanyRequest { id, name }).await?;
            output_success(
                &output_format,
                &format!("Registered company {} ({})", company.name, company.id),
                Some(json!({ "company": company })),
            )
        }
    }
}
