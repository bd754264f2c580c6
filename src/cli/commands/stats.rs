use crate::api::CompanyQuery;
use crate::cli::commands::signed_in;
use crate::cli::utils::output_value;
use crate::cli::OutputFormat;
use crate::client::AppContext;
use crate::types::CompanyId;

pub async fn handle(company: Option<CompanyId>, context: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    let stats = signed_in(context)?
        .dashboard(&CompanyQuery { company_id: company })
        .await?;

    output_value(&output_format, &stats, |s| {
        println!("Tickets: {} total, {} open, {} unassigned", s.total_tickets, s.open_tickets, s.unassigned_tickets);
        println!("SLA breaches: {}", s.sla_breaches);
        match s.average_rating {
            Some(rating) => println!("Average rating: {:.1}/5", rating),
            None => println!("Average rating: -"),
        }
        println!("Technicians on duty: {}/{}", s.technicians_on_duty, s.technicians_total);
        println!();
        for (status, count) in &s.by_status {
            println!("  {:<12} {}", status, count);
        }
        println!();
        for (priority, count) in &s.by_priority {
            println!("  {:<12} {}", priority, count);
        }
    })
}
