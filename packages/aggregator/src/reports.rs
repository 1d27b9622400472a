//! Runs catalog reports against the incident store.

use crime_dashboard_report_models::{OVERVIEW_QUERY, ReportDefinition, ReportTable, catalog};
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::Database;

use crate::derive::{GroupedRow, shape_rows};
use crate::{AggregatorError, AggregatorOptions};

/// Result of running one report as part of [`run_all`].
#[derive(Debug)]
pub struct ReportOutcome {
    /// Catalog entry that was run.
    pub definition: &'static ReportDefinition,
    /// The table, or why it could not be produced.
    pub result: Result<ReportTable, AggregatorError>,
}

fn to_count(value: i64, column: &str) -> Result<u64, AggregatorError> {
    u64::try_from(value).map_err(|_| AggregatorError::Conversion {
        message: format!("negative {column}: {value}"),
    })
}

/// Runs the report's grouping query and returns its `(value, count)` rows
/// as stored.
///
/// # Errors
///
/// Returns [`AggregatorError`] if the query fails or returns values of an
/// unexpected type.
pub async fn grouped_rows(
    db: &dyn Database,
    definition: &ReportDefinition,
) -> Result<Vec<GroupedRow>, AggregatorError> {
    let rows = db.query_raw_params(definition.query, &[]).await?;

    let mut grouped = Vec::with_capacity(rows.len());
    for row in &rows {
        let value: Option<String> = row
            .to_value("category")
            .map_err(|e| AggregatorError::Conversion {
                message: format!("{}: category is not text: {e:?}", definition.id),
            })?;
        let total: i64 = row
            .to_value("total")
            .map_err(|e| AggregatorError::Conversion {
                message: format!("{}: total is not an integer: {e:?}", definition.id),
            })?;
        grouped.push(GroupedRow {
            value,
            count: to_count(total, "total")?,
        });
    }

    Ok(grouped)
}

/// Runs one report.
///
/// # Errors
///
/// Returns [`AggregatorError`] if the query fails, or if a value is
/// malformed and the policy is to fail.
pub async fn run(
    db: &dyn Database,
    definition: &ReportDefinition,
    options: &AggregatorOptions,
) -> Result<ReportTable, AggregatorError> {
    let grouped = grouped_rows(db, definition).await?;
    let source_rows = grouped.len();

    let rows = shape_rows(definition, grouped, options.top_n, options.malformed)?;

    log::debug!(
        "[{}] {source_rows} grouped values -> {} rows",
        definition.id,
        rows.len()
    );

    Ok(ReportTable {
        report: definition.id,
        rows,
    })
}

/// Runs every catalog report in page order.
///
/// Reports are independent: a failure is recorded in that report's
/// outcome and the remaining reports still run.
pub async fn run_all(db: &dyn Database, options: &AggregatorOptions) -> Vec<ReportOutcome> {
    let mut outcomes = Vec::with_capacity(catalog().len());

    for definition in catalog() {
        let result = run(db, definition, options).await;
        if let Err(e) = &result {
            log::error!("Report {} failed: {e}", definition.id);
        }
        outcomes.push(ReportOutcome { definition, result });
    }

    outcomes
}

/// Returns the total number of incidents in the store.
///
/// # Errors
///
/// Returns [`AggregatorError`] if the query fails.
pub async fn total_incidents(db: &dyn Database) -> Result<u64, AggregatorError> {
    let rows = db.query_raw_params(OVERVIEW_QUERY, &[]).await?;

    let total: i64 = rows.first().map_or(Ok(0), |row| {
        row.to_value("total")
            .map_err(|e| AggregatorError::Conversion {
                message: format!("total is not an integer: {e:?}"),
            })
    })?;

    to_count(total, "incident count")
}
