use anyhow::Context as _;
use clap::{Args, Subcommand};
use serde_json::json;
use uuid::Uuid;

use crate::api::{AssignRequest, CreateTicketRequest, RatingRequest, TicketPatch};
use crate::cli::commands::signed_in;
use crate::cli::utils::{output_empty_collection, output_success, output_value, ticket_line};
use crate::cli::OutputFormat;
use crate::client::AppContext;
use crate::filter::TicketFilter;
use crate::types::{CompanyId, Priority, TicketStatus};

#[derive(Subcommand)]
pub enum TicketCommands {
    #[command(about = "List tickets visible to you")]
    List(ListArgs),

    #[command(about = "Show one ticket")]
    Show {
        #[arg(help = "Ticket id")]
        id: Uuid,
    },

    #[command(about = "File a new ticket")]
    Create {
        #[arg(help = "Short summary")]
        title: String,
        #[arg(long, help = "What is wrong")]
        description: String,
        #[arg(long, help = "Category, e.g. Network or Hardware")]
        category: String,
        #[arg(long, default_value = "medium", help = "low, medium, high or critical")]
        priority: Priority,
        #[arg(long, help = "File on behalf of this user (admins)")]
        on_behalf_of: Option<Uuid>,
        #[arg(long, help = "Company to file in (global admins)")]
        company: Option<CompanyId>,
    },

    #[command(about = "Change status, priority or description")]
    Update {
        #[arg(help = "Ticket id")]
        id: Uuid,
        #[arg(long)]
        status: Option<TicketStatus>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        description: Option<String>,
    },

    #[command(about = "Assign a technician, or the top recommendation with --auto")]
    Assign {
        #[arg(help = "Ticket id")]
        id: Uuid,
        #[arg(long, conflicts_with = "auto", required_unless_present = "auto")]
        technician: Option<Uuid>,
        #[arg(long)]
        auto: bool,
    },

    #[command(about = "Rate a resolved ticket you filed")]
    Rate {
        #[arg(help = "Ticket id")]
        id: Uuid,
        #[arg(help = "1 to 5")]
        rating: u8,
        #[arg(long)]
        feedback: Option<String>,
    },
}

#[derive(Args, Clone, Default)]
pub struct ListArgs {
    #[arg(long, help = "Only tickets without a technician")]
    pub unassigned: bool,
    #[arg(long)]
    pub company: Option<CompanyId>,
    #[arg(long)]
    pub technician: Option<Uuid>,
    #[arg(long)]
    pub status: Option<TicketStatus>,
}

impl ListArgs {
    pub fn filter(&self) -> TicketFilter {
        TicketFilter {
            unassigned: self.unassigned.then_some(true),
            company_id: self.company,
            technician: self.technician,
            status: self.status,
            ..Default::default()
        }
    }
}

pub async fn handle(cmd: TicketCommands, context: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = signed_in(context)?;

    match cmd {
        TicketCommands::List(args) => {
            let tickets = client.list_tickets(&args.filter()).await?;
            if tickets.is_empty() {
                return output_empty_collection(&output_format, "tickets", "No tickets found");
            }
            output_value(&output_format, &tickets, |tickets| {
                for ticket in tickets {
                    println!("{}", ticket_line(ticket));
                }
            })
        }
        TicketCommands::Show { id } => {
            let ticket = client.get_ticket(id).await?;
            output_value(&output_format, &ticket, |t| {
                println!("{}  {}", t.id, t.title);
                println!("Status: {}  Priority: {}  Category: {}", t.status, t.priority, t.category);
                println!("Company: {}  Filed by: {}", t.company_id, t.created_by);
                match t.technician {
                    Some(technician) => println!("Technician: {}", technician),
                    None => println!("Technician: unassigned"),
                }
                if let Some(due) = t.sla_due_at {
                    println!("SLA due: {}", due.format("%Y-%m-%d %H:%M UTC"));
                }
                if let Some(rating) = t.rating {
                    println!("Rating: {}/5 {}", rating, t.feedback.as_deref().unwrap_or(""));
                }
                println!();
                println!("{}", t.description);
            })
        }
        TicketCommands::Create {
            title,
            description,
            category,
            priority,
            on_behalf_of,
            company,
        } => {
            let request = CreateTicketRequest {
                title,
                description,
                category,
                priority,
                created_by: on_behalf_of,
                company_id: company,
            };
            let ticket = client.create_ticket(&request).await.context("creating ticket")?;
            output_success(
                &output_format,
                &format!("Created ticket {} (SLA {})", ticket.id, sla_label(&ticket)),
                Some(json!({ "ticket": ticket })),
            )
        }
        TicketCommands::Update {
            id,
            status,
            priority,
            description,
        } => {
            let patch = TicketPatch {
                status,
                priority,
                description,
            };
            if patch.is_empty() {
                anyhow::bail!("Nothing to update: pass --status, --priority or --description");
            }
            let ticket = client.update_ticket(id, &patch).await?;
            output_success(
                &output_format,
                &format!("Ticket {} is {} / {}", ticket.id, ticket.status, ticket.priority),
                Some(json!({ "ticket": ticket })),
            )
        }
        TicketCommands::Assign { id, technician, auto } => {
            let request = AssignRequest {
                technician_id: technician,
                auto,
            };
            let ticket = client.assign_ticket(id, &request).await?;
            let technician = ticket.technician.map(|t| t.to_string()).unwrap_or_default();
            output_success(
                &output_format,
                &format!("Ticket {} assigned to {}", ticket.id, technician),
                Some(json!({ "ticket": ticket })),
            )
        }
        TicketCommands::Rate { id, rating, feedback } => {
            let ticket = client.rate_ticket(id, &RatingRequest { rating, feedback }).await?;
            output_success(
                &output_format,
                &format!("Rated ticket {} {}/5", ticket.id, rating),
                Some(json!({ "ticket": ticket })),
            )
        }
    }
}

fn sla_label(ticket: &crate::database::models::Ticket) -> String {
    ticket
        .sla_due_at
        .map(|due| due.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "none".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_flags_become_a_filter() {
        let args = ListArgs {
            unassigned: true,
            company: Some(2),
            status: Some(TicketStatus::New),
            ..Default::default()
        };
        let filter = args.filter();
        assert_eq!(filter.unassigned, Some(true));
        assert_eq!(filter.company_id, Some(2));
        assert_eq!(filter.status, Some(TicketStatus::New));

        assert_eq!(ListArgs::default().filter(), TicketFilter::default());
    }
}
