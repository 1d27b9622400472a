//! Loads the source CSV dataset into the `crimes` table.
//!
//! The dataset's headers are the column names, so rows deserialize straight
//! into [`IncidentRecord`]. Columns the reports do not use are dropped.

use std::path::Path;
use std::sync::Arc;

use crime_dashboard_incident_models::{INCIDENTS_TABLE, IncidentColumn, IncidentRecord};
use switchy_database::{Database, DatabaseValue};

use crate::DbError;
use crate::progress::ProgressCallback;

/// Rows per INSERT statement. Nine parameters per row keeps each statement
/// under `SQLite`'s default limit of 999 bound variables.
const CHUNK_SIZE: usize = 100;

/// Records buffered from the CSV before they are written.
const BATCH_SIZE: usize = 5_000;

fn opt_str(value: Option<&str>) -> DatabaseValue {
    value.map_or(DatabaseValue::Null, |s| DatabaseValue::String(s.to_string()))
}

fn opt_i64(value: Option<i64>) -> DatabaseValue {
    value.map_or(DatabaseValue::Null, DatabaseValue::Int64)
}

fn record_values(record: &IncidentRecord) -> [DatabaseValue; 9] {
    [
        opt_str(record.city.as_deref()),
        opt_str(record.crime_description.as_deref()),
        opt_str(record.weapon_used.as_deref()),
        opt_str(record.victim_gender.as_deref()),
        opt_i64(record.victim_age),
        opt_str(record.time_of_occurrence.as_deref()),
        opt_str(record.date_of_occurrence.as_deref()),
        opt_str(record.case_closed.as_deref()),
        opt_str(record.crime_domain.as_deref()),
    ]
}

/// Inserts incident records into the `crimes` table.
///
/// Returns the number of rows inserted.
///
/// # Errors
///
/// Returns [`DbError`] if any INSERT fails.
pub async fn insert_incidents(
    db: &dyn Database,
    incidents: &[IncidentRecord],
) -> Result<u64, DbError> {
    let column_list = IncidentColumn::all()
        .iter()
        .map(|c| c.quoted())
        .collect::<Vec<_>>()
        .join(", ");
    let width = IncidentColumn::all().len();

    let mut total_inserted = 0u64;

    for chunk in incidents.chunks(CHUNK_SIZE) {
        let mut sql = format!("INSERT INTO {INCIDENTS_TABLE} ({column_list}) VALUES ");
        let mut params: Vec<DatabaseValue> = Vec::with_capacity(chunk.len() * width);

        for (i, record) in chunk.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            let placeholders: Vec<String> = (1..=width)
                .map(|col| format!("${}", i * width + col))
                .collect();
            sql.push('(');
            sql.push_str(&placeholders.join(", "));
            sql.push(')');

            params.extend(record_values(record));
        }

        total_inserted += db.exec_raw_params(&sql, &params).await?;
    }

    Ok(total_inserted)
}

/// Reads incident records from CSV data and inserts them.
///
/// Progress is reported as the byte offset reached in the input.
///
/// # Errors
///
/// Returns [`DbError::Csv`] on a malformed CSV row, or [`DbError`] if an
/// INSERT fails.
pub async fn import_csv<R: std::io::Read>(
    db: &dyn Database,
    reader: R,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<u64, DbError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut records = csv_reader.deserialize::<IncidentRecord>();

    let mut batch: Vec<IncidentRecord> = Vec::with_capacity(BATCH_SIZE);
    let mut total = 0u64;

    while let Some(result) = records.next() {
        batch.push(result?);

        if batch.len() >= BATCH_SIZE {
            total += insert_incidents(db, &batch).await?;
            batch.clear();
            progress.set_position(records.reader().position().byte());
            log::debug!("Imported {total} incidents so far");
        }
    }

    if !batch.is_empty() {
        total += insert_incidents(db, &batch).await?;
    }

    progress.finish(format!("Imported {total} incidents"));

    Ok(total)
}

/// Imports a CSV file into the `crimes` table.
///
/// # Errors
///
/// Returns [`DbError`] if the file cannot be opened or the import fails.
pub async fn import_csv_file(
    db: &dyn Database,
    path: &Path,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<u64, DbError> {
    let file = std::fs::File::open(path)?;
    progress.set_total(file.metadata()?.len());

    log::info!("Importing incidents from {}", path.display());
    let total = import_csv(db, file, progress).await?;
    log::info!("Imported {total} incidents from {}", path.display());

    Ok(total)
}
