//! Database connection utilities.

use std::path::Path;

use switchy_database::Database;
use switchy_database_connection::init_sqlite_rusqlite;

use crate::{DbError, schema};

/// Opens an existing incidents database for reporting.
///
/// The SQLite backend has no read-only mode, so the connection itself is
/// read-write; reporting only ever issues `SELECT`s through it. A missing
/// file is reported rather than created. The schema is checked before the
/// connection is returned, so a missing table or column fails here rather
/// than in the middle of a render.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the file does not exist, or any error
/// from opening the connection or verifying the schema.
pub async fn open(path: &Path) -> Result<Box<dyn Database>, DbError> {
    if !path.exists() {
        return Err(DbError::NotFound {
            path: path.to_path_buf(),
        });
    }

    log::info!("Opening incidents database at {}", path.display());
    let db = init_sqlite_rusqlite(Some(path)).map_err(|e| DbError::Connection(e.to_string()))?;

    schema::verify_schema(db.as_ref()).await?;

    Ok(db)
}

/// Opens (or creates) an incidents database and ensures the `crimes` table
/// exists.
///
/// # Errors
///
/// Returns [`DbError`] if the parent directory cannot be created, the
/// connection fails, or schema creation fails.
pub async fn create(path: &Path) -> Result<Box<dyn Database>, DbError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let db = init_sqlite_rusqlite(Some(path)).map_err(|e| DbError::Connection(e.to_string()))?;

    schema::create_schema(db.as_ref()).await?;

    Ok(db)
}
