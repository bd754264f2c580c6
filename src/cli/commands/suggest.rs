use crate::api::TechnicianQuery;
use crate::cli::commands::signed_in;
use crate::cli::utils::{output_empty_collection, output_value, short_id};
use crate::cli::OutputFormat;
use crate::client::AppContext;
use crate::filter::TicketFilter;
use crate::recommender;
use crate::types::CompanyId;

/// Runs the recommender locally over what the server lists. A failed fetch
/// shows an empty view rather than aborting.
pub async fn handle(company: Option<CompanyId>, context: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = signed_in(context)?;

    let filter = TicketFilter {
        company_id: company,
        ..TicketFilter::unassigned()
    };
    let query = TechnicianQuery {
        include_workload: Some(true),
        company_id: company,
    };

    let (tickets, technicians) = tokio::join!(client.list_tickets(&filter), client.list_technicians(&query));
    let tickets = tickets.unwrap_or_else(|e| {
        tracing::warn!("Could not load unassigned tickets: {}", e);
        Vec::new()
    });
    let technicians = technicians.unwrap_or_else(|e| {
        tracing::warn!("Could not load technicians: {}", e);
        Vec::new()
    });

    let suggestions = recommender::suggest_unassigned(&tickets, &technicians);
    if suggestions.is_empty() {
        return output_empty_collection(&output_format, "suggestions", "No unassigned tickets");
    }

    output_value(&output_format, &suggestions, |all| {
        for ticket in all {
            println!("{}  {}", short_id(&ticket.ticket_id.to_string()), ticket.ticket_title);
            if ticket.suggestions.is_empty() {
                println!("    no technicians available");
            }
            for s in &ticket.suggestions {
                let reasons: Vec<&str> = s.reasons.iter().map(|r| r.label()).collect();
                println!("    {:>3}  {:<20} {}", s.score, s.technician_name, reasons.join(", "));
            }
        }
    })
}
