#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `SQLite` incident store for the crime dashboard.
//!
//! Uses `switchy_database` with the `rusqlite` backend. Reporting opens the
//! store with [`db::open`], which refuses to hand out a connection unless the
//! `crimes` table has every column the report catalog references. The
//! [`import`] module builds a fresh store from the source CSV dataset.

pub mod db;
pub mod import;
pub mod progress;
pub mod schema;

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// Database query error.
    #[error("Database error: {0}")]
    Database(#[from] switchy_database::DatabaseError),

    /// The connection could not be initialized.
    #[error("Failed to open database: {0}")]
    Connection(String),

    /// The database file does not exist.
    #[error("Database not found at {}", .path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The incidents table does not exist.
    #[error("Table `{table}` does not exist")]
    MissingTable {
        /// Name of the missing table.
        table: String,
    },

    /// The incidents table lacks columns that reports depend on.
    #[error("Table `{table}` is missing columns: {}", .columns.join(", "))]
    MissingColumns {
        /// Name of the table.
        table: String,
        /// Names of the missing columns.
        columns: Vec<String>,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The source CSV could not be read.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
