#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the crime dashboard.
//!
//! Serves the dashboard, prints a single report, exports every report as
//! CSV, or imports a CSV dataset into a fresh store. Run without a
//! subcommand for an interactive menu.
//!
//! Uses `indicatif-log-bridge` (via [`crime_dashboard_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.

mod commands;
mod interactive;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use crime_dashboard_cli_utils::IndicatifProgress;

use crate::commands::{DEFAULT_EXPORT_DIR, parse_report_id};

#[derive(Parser)]
#[command(name = "crime_dashboard", about = "Crime statistics dashboard")]
struct Cli {
    /// Config file (defaults to `crime_dashboard.toml` when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard over HTTP
    Serve {
        /// Address to bind to (overrides `bind_addr`)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (overrides `port`)
        #[arg(long)]
        port: Option<u16>,
    },
    /// List the reports in the catalog
    Reports,
    /// Run one report and print its table
    Report {
        /// Report identifier (e.g. "`city_crimes`")
        #[arg(value_parser = parse_report_id)]
        report: crime_dashboard_report_models::ReportId,
    },
    /// Write every report's CSV export into a directory
    Export {
        /// Output directory
        #[arg(long, default_value = DEFAULT_EXPORT_DIR)]
        out_dir: PathBuf,
    },
    /// Load a CSV dataset into the `crimes` table
    Import {
        /// CSV file with the dataset's column headers
        csv: PathBuf,
        /// Database to create or append to (overrides `database_path`)
        #[arg(long)]
        db: Option<PathBuf>,
        /// Delete the existing database first
        #[arg(long)]
        replace: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = crime_dashboard_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut config = crime_dashboard_config::load(cli.config.as_deref())?;

    let Some(command) = cli.command else {
        return interactive::run(&config, &multi).await;
    };

    match command {
        Commands::Serve { bind, port } => {
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if let Some(port) = port {
                config.port = port;
            }
            commands::serve(&config, false).await?;
        }
        Commands::Reports => commands::list_reports(),
        Commands::Report { report } => commands::print_report(&config, report).await?,
        Commands::Export { out_dir } => {
            commands::export_reports(&config, &out_dir, &multi).await?;
        }
        Commands::Import { csv, db, replace } => {
            let db_path = db.unwrap_or(config.database_path);
            let progress = IndicatifProgress::bytes_bar(&multi, "Importing incidents");
            let total = commands::import_dataset(&csv, &db_path, replace, &progress).await?;
            log::info!("Imported {total} incidents into {}", db_path.display());
        }
    }

    Ok(())
}
