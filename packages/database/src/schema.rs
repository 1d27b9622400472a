//! Schema creation and verification for the `crimes` table.

use std::collections::BTreeSet;

use crime_dashboard_incident_models::{INCIDENTS_TABLE, IncidentColumn};
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::Database;

use crate::DbError;

/// Creates the `crimes` table if it does not already exist.
///
/// # Errors
///
/// Returns [`DbError`] if the DDL fails.
pub async fn create_schema(db: &dyn Database) -> Result<(), DbError> {
    let columns: Vec<String> = IncidentColumn::all()
        .iter()
        .map(|column| format!("{} {}", column.quoted(), column.sql_type()))
        .collect();
    let ddl = format!(
        "CREATE TABLE IF NOT EXISTS {INCIDENTS_TABLE} ({})",
        columns.join(", ")
    );

    db.exec_raw(&ddl).await?;

    Ok(())
}

/// Returns the column names of the `crimes` table, or an empty set if the
/// table does not exist.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn table_columns(db: &dyn Database) -> Result<BTreeSet<String>, DbError> {
    let rows = db
        .query_raw_params(
            &format!("SELECT name FROM pragma_table_info('{INCIDENTS_TABLE}')"),
            &[],
        )
        .await?;

    Ok(rows
        .iter()
        .filter_map(|row| row.to_value::<String>("name").ok())
        .collect())
}

/// Checks that the `crimes` table exists and has every column the reports
/// reference.
///
/// # Errors
///
/// Returns [`DbError::MissingTable`] or [`DbError::MissingColumns`] on a
/// schema mismatch, or [`DbError::Database`] if the check itself fails.
pub async fn verify_schema(db: &dyn Database) -> Result<(), DbError> {
    let columns = table_columns(db).await?;

    if columns.is_empty() {
        return Err(DbError::MissingTable {
            table: INCIDENTS_TABLE.to_string(),
        });
    }

    let missing: Vec<String> = IncidentColumn::all()
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|name| !columns.contains(*name))
        .map(ToString::to_string)
        .collect();

    if !missing.is_empty() {
        return Err(DbError::MissingColumns {
            table: INCIDENTS_TABLE.to_string(),
            columns: missing,
        });
    }

    log::debug!("Schema verified: {} columns", columns.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use switchy_database_connection::init_sqlite_rusqlite;

    use super::*;

    fn temp_db_path(name: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("crime_dashboard_schema_{name}.db"));
        let _ = std::fs::remove_file(&path);
        path
    }

    #[tokio::test]
    async fn created_schema_verifies() {
        let path = temp_db_path("created");
        let db = init_sqlite_rusqlite(Some(path.as_path())).unwrap();
        create_schema(db.as_ref()).await.unwrap();
        // Idempotent
        create_schema(db.as_ref()).await.unwrap();

        verify_schema(db.as_ref()).await.unwrap();
        let columns = table_columns(db.as_ref()).await.unwrap();
        assert!(columns.contains("Time of Occurrence"));
        assert_eq!(columns.len(), IncidentColumn::all().len());

        drop(db);
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn reports_missing_columns() {
        let path = temp_db_path("partial");
        let db = init_sqlite_rusqlite(Some(path.as_path())).unwrap();
        db.exec_raw("CREATE TABLE crimes (\"City\" TEXT, \"Crime Domain\" TEXT)")
            .await
            .unwrap();

        match verify_schema(db.as_ref()).await {
            Err(DbError::MissingColumns { columns, .. }) => {
                assert!(columns.contains(&"Victim Age".to_string()));
                assert!(!columns.contains(&"City".to_string()));
                assert_eq!(columns.len(), IncidentColumn::all().len() - 2);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }

        drop(db);
        let _ = std::fs::remove_file(&path);
    }
}
