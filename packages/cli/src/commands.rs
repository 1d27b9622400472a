//! Subcommand implementations shared by the argument parser and the
//! interactive menu.

use std::path::{Path, PathBuf};
use std::str::FromStr as _;
use std::sync::Arc;

use crime_dashboard_aggregator::{AggregatorOptions, reports};
use crime_dashboard_cli_utils::{IndicatifProgress, MultiProgress};
use crime_dashboard_config::DashboardConfig;
use crime_dashboard_database::progress::ProgressCallback;
use crime_dashboard_database::{db, import};
use crime_dashboard_presenter::export::write_export;
use crime_dashboard_report_models::{ReportId, ReportTable, catalog};
use crime_dashboard_server::aggregator_options;
use switchy_database::Database;

/// Result type for subcommands.
pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Directory exports are written to when none is given.
pub const DEFAULT_EXPORT_DIR: &str = "exports";

/// Parses a report id, listing the valid ids on failure.
pub fn parse_report_id(id: &str) -> Result<ReportId, String> {
    ReportId::from_str(id.trim()).map_err(|_| {
        let valid: Vec<String> = ReportId::all().iter().map(ToString::to_string).collect();
        format!("unknown report `{id}` (expected one of: {})", valid.join(", "))
    })
}

/// Formats a table as aligned text columns.
pub fn format_table(table: &ReportTable) -> String {
    let definition = table.definition();
    let width = table
        .rows
        .iter()
        .map(|row| row.category.chars().count())
        .chain(std::iter::once(definition.category_header.len()))
        .max()
        .unwrap_or(0);

    let mut out = format!(
        "{}\n{:<width$}  {:>8}\n{}\n",
        definition.heading,
        definition.category_header,
        definition.count_header,
        "-".repeat(width + 10),
    );
    for row in &table.rows {
        out.push_str(&format!("{:<width$}  {:>8}\n", row.category, row.count));
    }
    out.push_str(&format!("{:<width$}  {:>8}\n", "(total)", table.total()));
    out
}

/// Prints the report catalog.
pub fn list_reports() {
    println!("{:<16} HEADING", "ID");
    println!("{}", "-".repeat(50));
    for definition in catalog() {
        println!("{:<16} {}", definition.id, definition.heading);
    }
}

/// Runs one report and prints it.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the report fails.
pub async fn print_report(config: &DashboardConfig, report: ReportId) -> CliResult {
    let db = db::open(&config.database_path).await?;
    let options = aggregator_options(config);
    let table = reports::run(db.as_ref(), report.definition(), &options).await?;
    print!("{}", format_table(&table));
    Ok(())
}

/// Writes every report's CSV into `out_dir`.
///
/// Reports that fail are logged and skipped; the rest are still written.
/// Returns the paths written and the number of reports that failed.
///
/// # Errors
///
/// Returns an error if `out_dir` cannot be created or a file cannot be
/// written.
pub async fn export_all(
    db: &dyn Database,
    options: &AggregatorOptions,
    out_dir: &Path,
    progress: &Arc<dyn ProgressCallback>,
) -> CliResult<(Vec<PathBuf>, usize)> {
    std::fs::create_dir_all(out_dir)?;

    let mut written = Vec::new();
    let mut failed = 0;

    for outcome in reports::run_all(db, options).await {
        match outcome.result {
            Ok(table) => written.push(write_export(&table, out_dir)?),
            Err(e) => {
                log::error!("Skipping export of {}: {e}", outcome.definition.id);
                failed += 1;
            }
        }
        progress.inc(1);
    }

    progress.finish(format!(
        "Exported {} reports to {}",
        written.len(),
        out_dir.display()
    ));

    Ok((written, failed))
}

/// Opens the configured store and exports every report into `out_dir`.
///
/// # Errors
///
/// Returns an error if the store cannot be opened, a write fails, or any
/// report could not be computed.
pub async fn export_reports(
    config: &DashboardConfig,
    out_dir: &Path,
    multi: &MultiProgress,
) -> CliResult {
    let db = db::open(&config.database_path).await?;
    let progress =
        IndicatifProgress::steps_bar(multi, "Exporting reports", catalog().len() as u64);

    let (written, failed) =
        export_all(db.as_ref(), &aggregator_options(config), out_dir, &progress).await?;

    for path in &written {
        println!("{}", path.display());
    }

    if failed > 0 {
        return Err(format!("{failed} report(s) could not be exported").into());
    }

    Ok(())
}

/// Loads a CSV dataset into the store at `db_path`.
///
/// An existing store is appended to unless `replace` is set, in which case
/// it is deleted first.
///
/// # Errors
///
/// Returns an error if the old store cannot be removed or the import fails.
pub async fn import_dataset(
    csv_path: &Path,
    db_path: &Path,
    replace: bool,
    progress: &Arc<dyn ProgressCallback>,
) -> CliResult<u64> {
    if replace && db_path.exists() {
        log::info!("Removing existing database {}", db_path.display());
        std::fs::remove_file(db_path)?;
    }

    let db = db::create(db_path).await?;
    let total = import::import_csv_file(db.as_ref(), csv_path, progress).await?;

    Ok(total)
}

/// Starts the HTTP server on its own actix system.
///
/// # Errors
///
/// Returns an error if the server fails to start or stops with an error.
pub async fn serve(config: &DashboardConfig, interactive: bool) -> CliResult {
    let config = config.clone();

    // The server uses actix-web's runtime, so we need to run it
    // in a blocking task to avoid nesting tokio runtimes.
    tokio::task::spawn_blocking(move || {
        actix_web::rt::System::new().block_on(async move {
            if interactive {
                crime_dashboard_server::interactive::run(&config).await
            } else {
                crime_dashboard_server::run_server(&config).await
            }
        })
    })
    .await??;

    Ok(())
}
