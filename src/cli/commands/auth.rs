use anyhow::Context as _;
use serde_json::json;

use crate::cli::commands::signed_in;
use crate::cli::utils::{output_success, output_value};
use crate::cli::OutputFormat;
use crate::client::AppContext;

pub async fn login(context: &mut AppContext, email: &str, password: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = context.client()?;
    let response = client
        .login(email, password)
        .await
        .with_context(|| format!("signing in to {}", context.server_url))?;

    let user = response.user.clone();
    context.login(None, response);
    context.persist()?;
    tracing::debug!("Session saved to {}", context.dir().display());

    output_success(
        &output_format,
        &format!("Logged in as {} ({}, company {})", user.name, user.role, user.company_id),
        Some(json!({ "user": user, "server": context.server_url })),
    )
}

pub fn logout(context: &mut AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    let was_signed_in = context.is_authenticated();
    context.clear();
    context.persist()?;

    let message = if was_signed_in { "Logged out" } else { "No session to log out of" };
    output_success(&output_format, message, None)
}

pub async fn whoami(context: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    let user = signed_in(context)?.whoami().await?;
    output_value(&output_format, &user, |user| {
        println!("{} <{}>", user.name, user.email);
        println!("Role: {}", user.role);
        println!("Company: {}", user.company_id);
        if let Some(technician_id) = user.technician_id {
            println!("Technician: {}", technician_id);
        }
    })
}
