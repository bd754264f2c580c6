use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::database::models::{Technician, Ticket};

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(object)) = (data, response.as_object_mut()) {
                object.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// JSON dumps the value as-is; text hands it to `render`
pub fn output_value<T: Serialize>(output_format: &OutputFormat, value: &T, render: impl FnOnce(&T)) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => render(value),
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(output_format: &OutputFormat, collection_name: &str, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ collection_name: [] }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

pub fn ticket_line(ticket: &Ticket) -> String {
    let technician = ticket
        .technician
        .map(|id| short_id(&id.to_string()))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{}  {:<11} {:<8} {:<9} {}  [{}]",
        short_id(&ticket.id.to_string()),
        ticket.status.as_str(),
        ticket.priority.as_str(),
        technician,
        ticket.title,
        ticket.category
    )
}

pub fn technician_line(technician: &Technician) -> String {
    let workload = technician
        .current_tickets
        .map(|n| format!("{} open", n))
        .unwrap_or_default();
    format!(
        "{}  {:<20} {:<14} {:<8} company {}  {}",
        short_id(&technician.id.to_string()),
        technician.name,
        technician.department,
        technician.duty_status.as_str(),
        technician.company_id,
        workload
    )
}

pub fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}
