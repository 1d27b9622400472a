//! Interactive mode for the server.
//!
//! Prompts for bind address and port, starting from the configured values,
//! before starting the server.

use crime_dashboard_config::DashboardConfig;
use dialoguer::{Confirm, Input};

use crate::ServerError;

/// Runs the server in interactive mode, prompting for where to listen.
///
/// # Errors
///
/// Returns [`ServerError`] if the underlying server fails to start.
#[allow(clippy::future_not_send)]
pub async fn run(config: &DashboardConfig) -> Result<(), ServerError> {
    println!("Crime Dashboard Server");
    println!();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(config.bind_addr.clone())
        .interact_text()
        .unwrap_or_else(|_| config.bind_addr.clone());

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(config.port)
        .interact_text()
        .unwrap_or(config.port);

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    let config = DashboardConfig {
        bind_addr,
        port,
        ..config.clone()
    };

    super::run_server(&config).await
}
