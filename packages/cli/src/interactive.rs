//! Interactive menu shown when no subcommand is given.

use std::path::PathBuf;

use crime_dashboard_cli_utils::{IndicatifProgress, MultiProgress};
use crime_dashboard_config::DashboardConfig;
use crime_dashboard_report_models::catalog;
use dialoguer::{Confirm, Input, Select};

use crate::commands::{self, CliResult, DEFAULT_EXPORT_DIR};

/// Top-level actions offered by the menu.
enum Action {
    Serve,
    ShowReport,
    ExportAll,
    Import,
}

impl Action {
    const ALL: &[Self] = &[Self::Serve, Self::ShowReport, Self::ExportAll, Self::Import];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Serve => "Start dashboard server",
            Self::ShowReport => "Show a report",
            Self::ExportAll => "Export all reports as CSV",
            Self::Import => "Import a CSV dataset",
        }
    }
}

/// Prompts for an action and runs it.
///
/// # Errors
///
/// Returns an error if a prompt fails or the chosen action fails.
pub async fn run(config: &DashboardConfig, multi: &MultiProgress) -> CliResult {
    println!("Crime Dashboard");
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::Serve => commands::serve(config, true).await?,
        Action::ShowReport => {
            let headings: Vec<&str> = catalog().iter().map(|def| def.heading).collect();
            let report = Select::new()
                .with_prompt("Which report?")
                .items(&headings)
                .default(0)
                .interact()?;
            commands::print_report(config, catalog()[report].id).await?;
        }
        Action::ExportAll => {
            let out_dir: String = Input::new()
                .with_prompt("Output directory")
                .default(DEFAULT_EXPORT_DIR.to_string())
                .interact_text()?;
            commands::export_reports(config, &PathBuf::from(out_dir), multi).await?;
        }
        Action::Import => {
            let csv: String = Input::new().with_prompt("CSV file").interact_text()?;
            let db: String = Input::new()
                .with_prompt("Database")
                .default(config.database_path.display().to_string())
                .interact_text()?;
            let db = PathBuf::from(db);

            let replace = db.exists()
                && Confirm::new()
                    .with_prompt(format!("{} exists. Replace it?", db.display()))
                    .default(false)
                    .interact()?;

            let progress = IndicatifProgress::bytes_bar(multi, "Importing incidents");
            let total =
                commands::import_dataset(&PathBuf::from(csv), &db, replace, &progress).await?;
            println!("Imported {total} incidents into {}", db.display());
        }
    }

    Ok(())
}
